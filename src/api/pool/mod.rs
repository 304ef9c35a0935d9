mod v1;
pub use v1::*;

use serde_json::Value;

use pools::algorithm::{PoolError, PoolId};

use super::ApiError;

#[derive(Debug, Clone, PartialEq)]
pub struct WritePayload {
    pub id: PoolId,
    pub values: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct QueryPayload {
    pub id: PoolId,
    pub percentile: f64,
}

impl WritePayload {
    pub fn parse(body: &[u8]) -> Result<Self, ApiError> {
        let payload = decode(body)?;
        let id = pool_id(&payload)?;
        let values = match payload.get("poolValues") {
            Some(Value::Array(values)) => values
                .iter()
                .map(|value| {
                    value.as_f64().ok_or_else(|| {
                        PoolError::InvalidInput(format!("poolValues holds a non-number: {}", value))
                    })
                })
                .collect::<Result<Vec<f64>, PoolError>>()?,
            _ => {
                return Err(PoolError::InvalidInput("poolValues must be an array".to_string()).into())
            }
        };

        Ok(WritePayload { id, values })
    }
}

impl QueryPayload {
    pub fn parse(body: &[u8]) -> Result<Self, ApiError> {
        let payload = decode(body)?;
        let id = pool_id(&payload)?;
        let percentile = payload
            .get("percentile")
            .and_then(Value::as_f64)
            .ok_or_else(|| PoolError::InvalidInput("percentile must be a number".to_string()))?;

        Ok(QueryPayload { id, percentile })
    }
}

fn decode(body: &[u8]) -> Result<Value, ApiError> {
    match serde_json::from_slice::<Value>(body) {
        // nothing can be destructured out of `null`
        Ok(Value::Null) | Err(_) => Err(ApiError::InvalidJson),
        Ok(payload) => Ok(payload),
    }
}

fn pool_id(payload: &Value) -> Result<PoolId, PoolError> {
    match payload.get("poolId").and_then(Value::as_f64) {
        Some(id) => PoolId::new(id),
        None => Err(PoolError::InvalidInput("poolId must be a number".to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_write_payload() {
        let payload = WritePayload::parse(br#"{"poolId": 1, "poolValues": [1, 2.5, -3]}"#).unwrap();

        assert_eq!(payload.id, PoolId::new(1.0).unwrap());
        assert_eq!(payload.values, vec![1.0, 2.5, -3.0]);
    }

    #[test]
    fn test_parse_write_payload_rejects_wrong_shape() {
        for body in [
            r#"{"poolId": "1", "poolValues": [1]}"#,
            r#"{"poolValues": [1]}"#,
            r#"{"poolId": 1, "poolValues": 1}"#,
            r#"{"poolId": 1, "poolValues": ["1"]}"#,
            r#"{"poolId": 1}"#,
            r#"[1, 2, 3]"#,
        ] {
            assert!(
                matches!(
                    WritePayload::parse(body.as_bytes()),
                    Err(ApiError::Pool(PoolError::InvalidInput(_)))
                ),
                "{} should be rejected as invalid input",
                body
            );
        }
    }

    #[test]
    fn test_parse_rejects_malformed_json() {
        for body in ["", "{", "null", "{\"poolId\": 1,}"] {
            assert!(matches!(
                QueryPayload::parse(body.as_bytes()),
                Err(ApiError::InvalidJson)
            ));
        }
    }

    #[test]
    fn test_parse_query_payload() {
        let payload = QueryPayload::parse(br#"{"poolId": 2.0, "percentile": 99.5}"#).unwrap();

        assert_eq!(payload.id, PoolId::new(2.0).unwrap());
        assert_eq!(payload.percentile, 99.5);

        assert!(matches!(
            QueryPayload::parse(br#"{"poolId": 2, "percentile": "50"}"#),
            Err(ApiError::Pool(PoolError::InvalidInput(_)))
        ));
    }
}
