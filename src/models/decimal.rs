use bigdecimal::{BigDecimal, ToPrimitive};
use serde::Serializer;

/// Emits a decimal as a JSON number rather than bigdecimal's default string form.
pub fn as_number<S>(value: &BigDecimal, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_f64(value.to_f64().unwrap_or(0.0))
}
