use std::io::{self, BufRead, ErrorKind, Write};

use crate::Credentials;

/// What the operator provides at the start of a run.
#[derive(Debug, Clone)]
pub struct OperatorInput {
    /// The reseller server's hostname or IP.
    pub hostname: String,

    /// The reseller's login.
    pub credentials: Credentials,

    /// The migration ticket number.
    pub ticket_id: String,
}

impl OperatorInput {
    /// Ask for each input on the terminal, the password is read without echo.
    pub fn prompt() -> io::Result<Self> {
        let stdin = io::stdin();
        let mut input = stdin.lock();
        let mut output = io::stdout();

        let hostname = prompt_line(
            &mut input,
            &mut output,
            "Please provide the reseller server's hostname or IP: ",
        )?;
        let username = prompt_line(
            &mut input,
            &mut output,
            "Please provide the reseller username: ",
        )?;
        let password = prompt_password("Please provide the reseller server's password: ")?;
        let ticket_id = prompt_line(
            &mut input,
            &mut output,
            "Please provide the ticket number: ",
        )?;

        Ok(Self {
            hostname,
            credentials: Credentials { username, password },
            ticket_id,
        })
    }
}

/// Write `message` and read a trimmed line, asking again until the answer is not empty.
pub fn prompt_line<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    message: &str,
) -> io::Result<String> {
    loop {
        write!(output, "{message}")?;
        output.flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            return Err(io::Error::new(
                ErrorKind::UnexpectedEof,
                "input closed before an answer was given",
            ));
        }

        let answer = line.trim();
        if !answer.is_empty() {
            return Ok(answer.to_string());
        }
    }
}

fn prompt_password(message: &str) -> io::Result<String> {
    loop {
        let password = rpassword::prompt_password(message)?;
        if !password.is_empty() {
            return Ok(password);
        }
    }
}
