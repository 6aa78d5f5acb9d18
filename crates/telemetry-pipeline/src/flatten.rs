//! One-level flattening of per-car entities into [`FlatRecord`]s.

use serde::Serialize;
use serde_json::Value;

use crate::error::FlattenError;
use crate::record::{FieldValue, FlatRecord, epoch_seconds};

/// Field added to every flattened entity: its position in the input.
pub const CAR_INDEX_FIELD: &str = "car_index";

/// Debug-mode latency stamp added after flattening.
pub const CHECKPOINT_FLATTENED: &str = "checkpoint_2_payload_flattened";

/// Flatten a list of entities, one record per entity, in input order.
///
/// Scalar fields copy through. A sequence field `f` of length K becomes
/// `f1..fK`, 1-based, and `f` itself is dropped. Every record gets
/// `car_index` set to its position. Null fields are dropped rather than
/// copied, so an absent optional never reaches a sink as `null`. When `debug`
/// is on, records are stamped with [`CHECKPOINT_FLATTENED`].
pub fn flatten_entities(entities: &[Value], debug: bool) -> Result<Vec<FlatRecord>, FlattenError> {
    let mut records = Vec::with_capacity(entities.len());
    for (index, entity) in entities.iter().enumerate() {
        if !entity.is_object() {
            return Err(FlattenError::NotAnObject { index });
        }
        let mut record = flatten_object(entity)?;
        record.insert(CAR_INDEX_FIELD, FieldValue::Integer(slot_value(index)));
        if debug {
            record.insert(CHECKPOINT_FLATTENED, epoch_seconds());
        }
        records.push(record);
    }
    Ok(records)
}

/// Serialize each item and flatten the result.
pub fn flatten_serialized<T: Serialize>(
    items: &[T],
    debug: bool,
) -> Result<Vec<FlatRecord>, FlattenError> {
    let entities = items
        .iter()
        .map(serde_json::to_value)
        .collect::<Result<Vec<_>, _>>()?;
    flatten_entities(&entities, debug)
}

/// Flatten a single object without adding `car_index`.
///
/// Null fields (e.g. absent optionals) are dropped. A record never carries a
/// null value.
pub fn flatten_object(entity: &Value) -> Result<FlatRecord, FlattenError> {
    let Value::Object(fields) = entity else {
        return Err(FlattenError::NotAnObject { index: 0 });
    };

    let mut record = FlatRecord::new();
    for (name, value) in fields {
        match value {
            // Absent, not a scalar.
            Value::Null => {}
            Value::Object(_) => {
                return Err(FlattenError::Nested {
                    field: name.clone(),
                });
            }
            Value::Array(items) => {
                for (i, item) in items.iter().enumerate() {
                    let scalar = FieldValue::from_json(item).ok_or_else(|| {
                        FlattenError::Nested {
                            field: name.clone(),
                        }
                    })?;
                    record.insert(format!("{name}{}", i + 1), scalar);
                }
            }
            scalar => {
                if let Some(v) = FieldValue::from_json(scalar) {
                    record.insert(name.clone(), v);
                }
            }
        }
    }
    Ok(record)
}

/// Serialize a single value and flatten it with [`flatten_object`].
pub fn flatten_one<T: Serialize>(item: &T) -> Result<FlatRecord, FlattenError> {
    flatten_object(&serde_json::to_value(item)?)
}

fn slot_value(index: usize) -> i64 {
    i64::try_from(index).unwrap_or(i64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    type TestResult = Result<(), Box<dyn std::error::Error>>;

    #[test]
    fn arrays_expand_one_based_and_original_key_is_removed() -> TestResult {
        let entities = [json!({"speed": 300, "brakes_temperature": [500, 510, 520, 530]})];
        let records = flatten_entities(&entities, false)?;
        let r = records.first().ok_or("no record")?;
        assert_eq!(r.get("brakes_temperature1"), Some(&FieldValue::Integer(500)));
        assert_eq!(r.get("brakes_temperature4"), Some(&FieldValue::Integer(530)));
        assert!(!r.contains_key("brakes_temperature"));
        assert!(!r.contains_key("brakes_temperature0"));
        assert!(!r.contains_key("brakes_temperature5"));
        Ok(())
    }

    #[test]
    fn car_index_follows_input_position() -> TestResult {
        let entities = [json!({"a": 1}), json!({"a": 2}), json!({"a": 3})];
        let records = flatten_entities(&entities, false)?;
        let indexes: Vec<_> = records
            .iter()
            .filter_map(|r| r.get(CAR_INDEX_FIELD).cloned())
            .collect();
        assert_eq!(
            indexes,
            vec![
                FieldValue::Integer(0),
                FieldValue::Integer(1),
                FieldValue::Integer(2)
            ]
        );
        Ok(())
    }

    #[test]
    fn nested_object_is_rejected() {
        let entities = [json!({"wheel": {"fl": 1}})];
        assert!(matches!(
            flatten_entities(&entities, false),
            Err(FlattenError::Nested { field }) if field == "wheel"
        ));
    }

    #[test]
    fn array_of_arrays_is_rejected() {
        let entities = [json!({"grid": [[1, 2], [3, 4]]})];
        assert!(flatten_entities(&entities, false).is_err());
    }

    #[test]
    fn debug_stamps_checkpoint() -> TestResult {
        let records = flatten_entities(&[json!({"a": 1})], true)?;
        let stamp = records
            .first()
            .and_then(|r| r.get(CHECKPOINT_FLATTENED))
            .and_then(FieldValue::as_f64)
            .ok_or("missing checkpoint")?;
        assert!(stamp > 1.6e9);
        Ok(())
    }

    #[test]
    fn null_fields_are_dropped_and_other_scalars_copy_through() -> TestResult {
        let entities = [json!({"a": null, "b": 0, "c": "", "d": [null, 2]})];
        let result = flatten_entities(&entities, false);
        // A null inside an array is not a scalar either.
        assert!(matches!(result, Err(FlattenError::Nested { ref field }) if field == "d"));

        let records = flatten_entities(&[json!({"a": null, "b": 0, "c": ""})], false)?;
        let r = records.first().ok_or("no record")?;
        assert!(!r.contains_key("a"));
        assert_eq!(r.get("b"), Some(&FieldValue::Integer(0)));
        assert_eq!(r.get("c"), Some(&FieldValue::Text(String::new())));
        assert_eq!(r.len(), 3, "b, c and car_index");
        Ok(())
    }

    #[test]
    fn nulls_are_skipped() -> TestResult {
        let r = flatten_object(&json!({"a": null, "b": true}))?;
        assert!(!r.contains_key("a"));
        assert_eq!(r.get("b"), Some(&FieldValue::Boolean(true)));
        Ok(())
    }
}
