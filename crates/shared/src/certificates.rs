use std::{
    fs::File,
    io::{self, BufReader},
    path::Path,
};

use rustls_pemfile::certs;
use rustls_pki_types::CertificateDer;
use thiserror::Error;

/// Tries to load every certificate from a PEM file, used to trust a panel's private CA.
pub fn load_root_certificates(
    root_certificate_file: &Path,
) -> Result<Vec<CertificateDer<'static>>, CertificateError> {
    let file = File::open(root_certificate_file).map_err(CertificateError::LoadRootCertificate)?;

    let root_certificates: Vec<_> = certs(&mut BufReader::new(file))
        .collect::<io::Result<_>>()
        .map_err(CertificateError::LoadRootCertificate)?;

    if root_certificates.is_empty() {
        return Err(CertificateError::NoRootCertificate);
    }

    Ok(root_certificates)
}

#[allow(missing_docs)]
#[derive(Debug, Error)]
pub enum CertificateError {
    #[error("Failed to load the root certificate file\n{0}")]
    LoadRootCertificate(#[source] io::Error),

    #[error("The root certificate file contained no certificates.")]
    NoRootCertificate,
}
