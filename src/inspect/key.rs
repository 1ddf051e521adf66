//! Private key decoding.
//!
//! Only RSA keys carry a modulus. Both the PKCS#8 (`PRIVATE KEY`) and the
//! traditional PKCS#1 (`RSA PRIVATE KEY`) encodings are accepted.

use super::{strip_leading_zeros, InspectError};
use rsa::pkcs1::DecodeRsaPrivateKey;
use rsa::pkcs8::DecodePrivateKey;
use rsa::traits::PublicKeyParts;
use rsa::RsaPrivateKey;
use std::path::Path;
use x509_parser::pem::Pem;

/// Modulus of the first private key block in `blocks`.
pub(crate) fn rsa_modulus(path: &Path, blocks: &[Pem]) -> Result<Vec<u8>, InspectError> {
    let pem = blocks
        .iter()
        .find(|pem| pem.label.ends_with("PRIVATE KEY"))
        .ok_or_else(|| InspectError::Missing {
            path: path.to_path_buf(),
            label: "private key",
        })?;

    let unsupported = |message: String| InspectError::UnsupportedKey {
        path: path.to_path_buf(),
        message,
    };

    let key = match pem.label.as_str() {
        "PRIVATE KEY" => RsaPrivateKey::from_pkcs8_der(&pem.contents)
            .map_err(|e| unsupported(format!("not an RSA PKCS#8 key: {}", e)))?,
        "RSA PRIVATE KEY" => RsaPrivateKey::from_pkcs1_der(&pem.contents)
            .map_err(|e| unsupported(format!("invalid PKCS#1 RSA key: {}", e)))?,
        "ENCRYPTED PRIVATE KEY" => {
            return Err(unsupported(
                "key is encrypted; supply the decrypted key".to_string(),
            ))
        }
        other => return Err(unsupported(format!("{} is not an RSA key", other))),
    };

    Ok(strip_leading_zeros(&key.n().to_bytes_be()).to_vec())
}
