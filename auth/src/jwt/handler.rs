use std::str::FromStr;

use jsonwebtoken::decode;
use jsonwebtoken::encode;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::Algorithm;
use jsonwebtoken::DecodingKey;
use jsonwebtoken::EncodingKey;
use jsonwebtoken::Header;
use jsonwebtoken::Validation;
use serde::Deserialize;
use serde::Serialize;

use super::errors::JwtError;

/// JWT token handler for encoding and decoding tokens.
///
/// Tokens are signed with a shared secret, so only the HMAC family
/// (HS256, HS384, HS512) is accepted.
pub struct JwtHandler {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    algorithm: Algorithm,
}

impl JwtHandler {
    /// Create a handler that signs with HS256.
    pub fn new(secret: &[u8]) -> Self {
        Self::from_parts(secret, Algorithm::HS256)
    }

    /// Create a handler for a named algorithm (e.g. `"HS512"`).
    ///
    /// # Errors
    /// * `UnsupportedAlgorithm` - Unknown name or not an HMAC algorithm
    pub fn with_algorithm(secret: &[u8], algorithm: &str) -> Result<Self, JwtError> {
        let parsed = Algorithm::from_str(algorithm)
            .map_err(|_| JwtError::UnsupportedAlgorithm(algorithm.to_string()))?;

        match parsed {
            Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512 => {
                Ok(Self::from_parts(secret, parsed))
            }
            _ => Err(JwtError::UnsupportedAlgorithm(algorithm.to_string())),
        }
    }

    fn from_parts(secret: &[u8], algorithm: Algorithm) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            algorithm,
        }
    }

    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    /// Encode claims into a signed token.
    ///
    /// # Errors
    /// * `EncodingFailed` - Claims could not be serialized or signed
    pub fn encode<T: Serialize>(&self, claims: &T) -> Result<String, JwtError> {
        let header = Header::new(self.algorithm);

        encode(&header, claims, &self.encoding_key)
            .map_err(|e| JwtError::EncodingFailed(e.to_string()))
    }

    /// Decode and validate a token.
    ///
    /// The signature, the header algorithm and the `exp` claim are all
    /// checked. No clock leeway is granted.
    ///
    /// # Errors
    /// * `TokenExpired` - `exp` lies in the past
    /// * `DecodingFailed` - Bad signature, wrong algorithm, missing `exp` or malformed token
    pub fn decode<T: for<'de> Deserialize<'de>>(&self, token: &str) -> Result<T, JwtError> {
        let mut validation = Validation::new(self.algorithm);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp"]);

        let token_data =
            decode::<T>(token, &self.decoding_key, &validation).map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => JwtError::TokenExpired,
                _ => JwtError::DecodingFailed(e.to_string()),
            })?;

        Ok(token_data.claims)
    }
}
