use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{Error, Result};

/// Top-level field holding the ordered relation list
pub const CATALOGUE_METADATA: &str = "catalogue-metadata";
/// Top-level field holding the opaque item list
pub const ITEMS: &str = "items";

/// Prefix reserved for signature envelope relations
pub const JWS_REL_PREFIX: &str = "urn:X-hypercat:rels:jws";
/// Relation carrying the base64 signature
pub const SIGNATURE_REL: &str = "urn:X-hypercat:rels:jws:signature";
/// Relation carrying the algorithm identifier
pub const ALG_REL: &str = "urn:X-hypercat:rels:jws:alg";
/// Relation carrying the signer's PEM public key
pub const KEY_REL: &str = "urn:X-hypercat:rels:jws:key";

/// A `{rel, val}` metadata entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Relation {
    /// URI-like relation identifier
    pub rel: String,
    /// Value associated with `rel`
    pub val: String,
}

impl Relation {
    /// Creates a relation.
    pub fn new(rel: impl Into<String>, val: impl Into<String>) -> Self {
        Relation {
            rel: rel.into(),
            val: val.into(),
        }
    }
}

/// Returns true if `rel` belongs to the signature envelope.
pub fn is_envelope_rel(rel: &str) -> bool {
    rel.starts_with(JWS_REL_PREFIX)
}

/// A validated Hypercat catalogue document.
///
/// Holds the whole JSON object, so fields this crate does not interpret (extra
/// top-level fields, extra keys on a relation) pass through signing untouched.
/// Construction guarantees `catalogue-metadata` is an array of objects with
/// string `rel` and `val`.
#[derive(Debug, Clone, PartialEq)]
pub struct Catalogue {
    document: Map<String, Value>,
}

impl Catalogue {
    /// Validates a JSON value as a catalogue.
    ///
    /// # Arguments
    ///
    /// * `value` - A parsed JSON document.
    ///
    /// # Returns
    ///
    /// The catalogue, or [`Error::MalformedCatalogue`] if the value is not an
    /// object, lacks an array `catalogue-metadata`, or has a relation without
    /// string `rel` and `val`.
    pub fn from_value(value: Value) -> Result<Self> {
        let Value::Object(document) = value else {
            return Err(Error::MalformedCatalogue(
                "document is not a JSON object".to_owned(),
            ));
        };

        let metadata = match document.get(CATALOGUE_METADATA) {
            Some(Value::Array(metadata)) => metadata,
            Some(_) => {
                return Err(Error::MalformedCatalogue(format!(
                    "'{CATALOGUE_METADATA}' is not an array"
                )))
            }
            None => {
                return Err(Error::MalformedCatalogue(format!(
                    "missing '{CATALOGUE_METADATA}'"
                )))
            }
        };

        for (i, entry) in metadata.iter().enumerate() {
            for field in ["rel", "val"] {
                if !entry.get(field).is_some_and(Value::is_string) {
                    return Err(Error::MalformedCatalogue(format!(
                        "relation {i} has no string '{field}'"
                    )));
                }
            }
        }

        Ok(Catalogue { document })
    }

    /// Parses and validates a catalogue from JSON text.
    pub fn from_json_str(s: &str) -> Result<Self> {
        let value: Value =
            serde_json::from_str(s).map_err(|e| Error::MalformedCatalogue(e.to_string()))?;
        Self::from_value(value)
    }

    /// Pretty-prints the catalogue with two-space indentation, preserving field order.
    ///
    /// A `serde_json::Value` tree always serializes, so this cannot fail.
    pub fn to_json_string_pretty(&self) -> String {
        format!("{:#}", Value::Object(self.document.clone()))
    }

    /// Returns the whole document as a JSON value.
    pub fn to_value(&self) -> Value {
        Value::Object(self.document.clone())
    }

    /// Consumes the catalogue, returning the document as a JSON value.
    pub fn into_value(self) -> Value {
        Value::Object(self.document)
    }

    /// Returns the raw `catalogue-metadata` entries.
    pub fn metadata(&self) -> &[Value] {
        match self.document.get(CATALOGUE_METADATA) {
            Some(Value::Array(metadata)) => metadata.as_slice(),
            _ => &[],
        }
    }

    /// Returns the `items` value, if present.
    pub fn items(&self) -> Option<&Value> {
        self.document.get(ITEMS)
    }

    /// Iterates the metadata as `(rel, val)` pairs in document order.
    pub fn relations(&self) -> impl Iterator<Item = (&str, &str)> {
        self.metadata().iter().filter_map(|entry| {
            let rel = entry.get("rel")?.as_str()?;
            let val = entry.get("val")?.as_str()?;
            Some((rel, val))
        })
    }

    /// Returns the `val` of the first relation whose `rel` equals `rel`.
    pub fn find_relation(&self, rel: &str) -> Option<&str> {
        self.relations()
            .find(|(candidate, _)| *candidate == rel)
            .map(|(_, val)| val)
    }

    /// Returns true if any signature envelope relation is present.
    pub fn is_signed(&self) -> bool {
        self.relations().any(|(rel, _)| is_envelope_rel(rel))
    }

    /// Returns the PEM public key embedded by the signer.
    ///
    /// This is a hint only: it proves nothing about who signed the catalogue.
    pub fn embedded_public_key(&self) -> Option<&str> {
        self.find_relation(KEY_REL)
    }

    /// Rebuilds the content the signer saw.
    ///
    /// Keeps every relation outside the `urn:X-hypercat:rels:jws` namespace in
    /// its original order and copies `items` through. Other top-level fields are
    /// dropped unless `keep_extra_fields` is set.
    pub fn without_signature_with(&self, keep_extra_fields: bool) -> Catalogue {
        let metadata = self
            .metadata()
            .iter()
            .filter(|entry| {
                !entry
                    .get("rel")
                    .and_then(Value::as_str)
                    .is_some_and(is_envelope_rel)
            })
            .cloned()
            .collect::<Vec<_>>();

        let mut document = Map::new();
        if keep_extra_fields {
            for (key, value) in &self.document {
                if key != CATALOGUE_METADATA && key != ITEMS {
                    document.insert(key.clone(), value.clone());
                }
            }
        }
        document.insert(CATALOGUE_METADATA.to_owned(), Value::Array(metadata));
        if let Some(items) = self.items() {
            document.insert(ITEMS.to_owned(), items.clone());
        }

        Catalogue { document }
    }

    /// Rebuilds the content the signer saw, dropping extra top-level fields.
    ///
    /// See [`Catalogue::without_signature_with`].
    pub fn without_signature(&self) -> Catalogue {
        self.without_signature_with(false)
    }

    /// Returns a copy with `relations` appended to `catalogue-metadata`.
    pub(crate) fn with_relations(&self, relations: Vec<Relation>) -> Catalogue {
        let mut document = self.document.clone();

        let mut metadata = self.metadata().to_vec();
        metadata.extend(relations.into_iter().map(|relation| {
            let mut entry = Map::new();
            entry.insert("rel".to_owned(), Value::String(relation.rel));
            entry.insert("val".to_owned(), Value::String(relation.val));
            Value::Object(entry)
        }));
        document.insert(CATALOGUE_METADATA.to_owned(), Value::Array(metadata));

        Catalogue { document }
    }
}

impl TryFrom<Value> for Catalogue {
    type Error = Error;

    fn try_from(value: Value) -> Result<Self> {
        Self::from_value(value)
    }
}

impl From<Catalogue> for Value {
    fn from(catalogue: Catalogue) -> Self {
        catalogue.into_value()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn signed_fixture() -> Catalogue {
        Catalogue::from_json_str(include_str!("../fixtures/catalogue.signed.json")).unwrap()
    }

    #[test]
    fn rejects_non_object() {
        let err = Catalogue::from_value(json!([1, 2])).unwrap_err();
        assert!(matches!(err, Error::MalformedCatalogue(_)), "{err:?}");
    }

    #[test]
    fn rejects_missing_metadata() {
        let err = Catalogue::from_value(json!({"items": []})).unwrap_err();
        assert!(matches!(err, Error::MalformedCatalogue(_)), "{err:?}");
    }

    #[test]
    fn rejects_non_array_metadata() {
        let err = Catalogue::from_value(json!({"catalogue-metadata": {}, "items": []})).unwrap_err();
        assert!(matches!(err, Error::MalformedCatalogue(_)), "{err:?}");
    }

    #[test]
    fn rejects_relation_without_rel() {
        let err = Catalogue::from_value(json!({
            "catalogue-metadata": [{"val": "x"}],
            "items": []
        }))
        .unwrap_err();
        assert!(matches!(err, Error::MalformedCatalogue(_)), "{err:?}");
    }

    #[test]
    fn rejects_invalid_json() {
        let err = Catalogue::from_json_str("{\"catalogue-metadata\": [").unwrap_err();
        assert!(matches!(err, Error::MalformedCatalogue(_)), "{err:?}");
    }

    #[test]
    fn rejects_numbers_outside_double_range() {
        let err = Catalogue::from_json_str(r#"{"catalogue-metadata": [], "items": [1e400]}"#)
            .unwrap_err();
        assert!(matches!(err, Error::MalformedCatalogue(_)), "{err:?}");
    }

    #[test]
    fn rejects_lone_surrogate_escapes() {
        let err = Catalogue::from_json_str(r#"{"catalogue-metadata": [], "items": ["\ud800"]}"#)
            .unwrap_err();
        assert!(matches!(err, Error::MalformedCatalogue(_)), "{err:?}");
    }

    #[test]
    fn items_are_optional() {
        let catalogue = Catalogue::from_value(json!({"catalogue-metadata": []})).unwrap();

        assert!(catalogue.items().is_none());
        assert!(catalogue.without_signature().items().is_none());
    }

    #[test]
    fn find_relation_returns_first_match() {
        let catalogue = Catalogue::from_value(json!({
            "catalogue-metadata": [
                {"rel": "urn:a", "val": "first"},
                {"rel": "urn:a", "val": "second"}
            ],
            "items": []
        }))
        .unwrap();

        assert_eq!(catalogue.find_relation("urn:a"), Some("first"));
        assert_eq!(catalogue.find_relation("urn:b"), None);
        assert!(!catalogue.is_signed());
    }

    #[test]
    fn without_signature_strips_envelope_in_order() {
        let signed = signed_fixture();
        assert!(signed.is_signed());

        let stripped = signed.without_signature();

        assert!(!stripped.is_signed());
        assert_eq!(
            stripped.relations().map(|(rel, _)| rel).collect::<Vec<_>>(),
            vec![
                "urn:X-hypercat:rels:isContentType",
                "urn:X-hypercat:rels:hasDescription:en",
                "urn:X-hypercat:rels:hasHomepage",
            ]
        );
        assert_eq!(stripped.items(), signed.items());
    }

    #[test]
    fn without_signature_strips_whole_namespace() {
        let catalogue = Catalogue::from_value(json!({
            "catalogue-metadata": [
                {"rel": "urn:X-hypercat:rels:jws:future", "val": "x"},
                {"rel": "urn:X-hypercat:rels:hasHomepage", "val": "https://example.org"},
                {"rel": "urn:X-hypercat:rels:jwsish", "val": "prefix match"}
            ]
        }))
        .unwrap();

        let stripped = catalogue.without_signature();

        assert_eq!(
            stripped.relations().collect::<Vec<_>>(),
            vec![("urn:X-hypercat:rels:hasHomepage", "https://example.org")]
        );
    }

    #[test]
    fn without_signature_drops_extra_fields_by_default() {
        let catalogue = Catalogue::from_value(json!({
            "catalogue-metadata": [],
            "items": [],
            "x-extension": {"a": 1}
        }))
        .unwrap();

        assert_eq!(
            catalogue.without_signature().into_value(),
            json!({"catalogue-metadata": [], "items": []})
        );
        assert_eq!(
            catalogue.without_signature_with(true).into_value(),
            catalogue.to_value()
        );
    }

    #[test]
    fn relation_extra_keys_survive() {
        let catalogue = Catalogue::from_value(json!({
            "catalogue-metadata": [{"rel": "urn:a", "val": "b", "lang": "en"}]
        }))
        .unwrap();

        assert_eq!(
            catalogue.without_signature().metadata()[0],
            json!({"rel": "urn:a", "val": "b", "lang": "en"})
        );
    }

    #[test]
    fn with_relations_leaves_original_untouched() {
        let catalogue = Catalogue::from_value(json!({"catalogue-metadata": [], "items": []})).unwrap();

        let extended = catalogue.with_relations(vec![Relation::new("urn:a", "b")]);

        assert!(catalogue.metadata().is_empty());
        assert_eq!(extended.metadata(), &[json!({"rel": "urn:a", "val": "b"})]);
    }

    #[test]
    fn pretty_output_preserves_field_order() {
        let catalogue = Catalogue::from_json_str(
            r#"{"items": [], "catalogue-metadata": [{"val": "b", "rel": "urn:a"}]}"#,
        )
        .unwrap();

        let pretty = catalogue.to_json_string_pretty();

        assert_eq!(
            pretty,
            "{\n  \"items\": [],\n  \"catalogue-metadata\": [\n    {\n      \"val\": \"b\",\n      \"rel\": \"urn:a\"\n    }\n  ]\n}"
        );
    }

    #[test]
    fn embedded_key_is_exposed() {
        let signed = signed_fixture();

        assert_eq!(
            signed.embedded_public_key(),
            Some(include_str!("../fixtures/keys/signer.pub.pem").trim_end())
        );
    }
}
