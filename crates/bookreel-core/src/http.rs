//! Size-capped response body reading

use bytes::{Bytes, BytesMut};
use reqwest::Response;

use crate::{Error, Result};

/// Read a response body, failing as soon as it exceeds `limit` bytes
///
/// A declared `Content-Length` over the limit fails before any body is read.
pub async fn read_body_capped(mut response: Response, limit: usize) -> Result<Bytes> {
    check_declared_length(response.content_length(), limit)?;

    let mut body = BytesMut::new();
    while let Some(chunk) = response.chunk().await? {
        push_capped(&mut body, &chunk, limit)?;
    }
    Ok(body.freeze())
}

fn check_declared_length(declared: Option<u64>, limit: usize) -> Result<()> {
    match declared {
        Some(len) if len > limit as u64 => Err(Error::BodyTooLarge { limit }),
        _ => Ok(()),
    }
}

fn push_capped(body: &mut BytesMut, chunk: &[u8], limit: usize) -> Result<()> {
    if body.len().saturating_add(chunk.len()) > limit {
        return Err(Error::BodyTooLarge { limit });
    }
    body.extend_from_slice(chunk);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_declared_length_over_limit_rejected() {
        assert!(matches!(
            check_declared_length(Some(11), 10),
            Err(Error::BodyTooLarge { limit: 10 })
        ));
        assert!(check_declared_length(Some(10), 10).is_ok());
        assert!(check_declared_length(None, 10).is_ok());
    }

    #[test]
    fn test_chunks_stop_at_limit() {
        let mut body = BytesMut::new();
        push_capped(&mut body, b"12345", 8).unwrap();
        push_capped(&mut body, b"678", 8).unwrap();
        assert_eq!(&body[..], b"12345678");

        let err = push_capped(&mut body, b"9", 8).unwrap_err();
        assert!(matches!(err, Error::BodyTooLarge { limit: 8 }));
        // The rejected chunk is not buffered
        assert_eq!(body.len(), 8);
    }
}
