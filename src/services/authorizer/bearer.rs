use crate::services::authorizer::VerificationError;

const SCHEME: &str = "bearer ";

/// Pull the token out of an `Authorization` header value.
///
/// - The scheme is matched case-insensitively (`Bearer`, `bearer`, `BEARER`).
/// - The token is the first space-separated piece after the scheme.
pub fn extract_token(header: Option<&str>) -> Result<&str, VerificationError> {
    let header = header.ok_or(VerificationError::MissingCredential)?;

    if header.is_empty() {
        return Err(VerificationError::MissingCredential);
    }

    let scheme = header
        .get(..SCHEME.len())
        .ok_or(VerificationError::MalformedCredential)?;

    if !scheme.eq_ignore_ascii_case(SCHEME) {
        return Err(VerificationError::MalformedCredential);
    }

    header[SCHEME.len()..]
        .split(' ')
        .next()
        .filter(|token| !token.is_empty())
        .ok_or(VerificationError::MalformedCredential)
}
