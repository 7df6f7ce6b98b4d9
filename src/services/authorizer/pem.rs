use base64::{Engine, engine::general_purpose::STANDARD};

use crate::services::authorizer::VerificationError;

const LINE_WIDTH: usize = 64;
const HEADER: &str = "-----BEGIN CERTIFICATE-----";
const FOOTER: &str = "-----END CERTIFICATE-----";

/// Wrap a base64 DER certificate (an `x5c` entry) into PEM.
///
/// The body is checked to be valid base64 first, so a malformed chain entry
/// becomes a verification failure instead of a PEM the key parser chokes on.
pub fn certificate_to_pem(der_base64: &str) -> Result<String, VerificationError> {
    let body = der_base64.trim();

    if body.is_empty() {
        return Err(VerificationError::InvalidCertificate(
            "empty certificate".to_string(),
        ));
    }

    STANDARD
        .decode(body)
        .map_err(|e| VerificationError::InvalidCertificate(e.to_string()))?;

    // base64 is ASCII, so chunking bytes never splits a character
    let lines = body
        .as_bytes()
        .chunks(LINE_WIDTH)
        .map(|chunk| String::from_utf8_lossy(chunk))
        .collect::<Vec<_>>()
        .join("\n");

    Ok(format!("{HEADER}\n{lines}\n{FOOTER}\n"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn body_lines(pem: &str) -> Vec<&str> {
        let lines: Vec<&str> = pem.lines().collect();
        assert_eq!(lines.first(), Some(&HEADER));
        assert_eq!(lines.last(), Some(&FOOTER));
        lines[1..lines.len() - 1].to_vec()
    }

    #[test]
    fn wraps_at_64_characters() {
        // 152 base64 chars -> 64 + 64 + 24
        let body = STANDARD.encode([7u8; 112]);
        assert_eq!(body.len(), 152);

        let pem = certificate_to_pem(&body).unwrap();
        let lines = body_lines(&pem);

        assert_eq!(lines.len(), 3);
        assert!(lines[..lines.len() - 1].iter().all(|l| l.len() == 64));
        assert_eq!(lines[2].len(), 24);
        assert_eq!(lines.concat(), body);
        assert!(pem.ends_with("-----END CERTIFICATE-----\n"));
    }

    #[test]
    fn exact_multiple_of_line_width_has_no_empty_line() {
        let body = STANDARD.encode([1u8; 96]);
        assert_eq!(body.len(), 128);

        let pem = certificate_to_pem(&body).unwrap();
        let lines = body_lines(&pem);

        assert_eq!(lines, vec![&body[..64], &body[64..]]);
    }

    #[test]
    fn various_lengths_keep_full_lines() {
        for n in [1usize, 3, 47, 48, 49, 200, 1024] {
            let body = STANDARD.encode(vec![0xabu8; n]);
            let pem = certificate_to_pem(&body).unwrap();
            let lines = body_lines(&pem);

            let (last, full) = lines.split_last().unwrap();
            assert!(full.iter().all(|l| l.len() == 64), "n = {n}");
            assert!(!last.is_empty() && last.len() <= 64, "n = {n}");
        }
    }

    #[test]
    fn rejects_malformed_entry() {
        assert!(matches!(
            certificate_to_pem("not base64 at all!"),
            Err(VerificationError::InvalidCertificate(_))
        ));
        assert!(matches!(
            certificate_to_pem(""),
            Err(VerificationError::InvalidCertificate(_))
        ));
    }
}
