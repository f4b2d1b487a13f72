//! Request bodies for the discovery endpoint.

use serde::Serialize;

use crate::selection::{Level, Selection};

/// Scene identifier of the studio comparison scene.
pub const SCENE_ID: u32 = 1;

/// Instance identifiers the API requires after the four selectable levels.
/// They are always sent unset.
pub const PLACEHOLDER_INSTANCE_IDS: [u32; 3] = [126, 171, 199];

/// One entry of the payload's `attributes` list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AttributeDescriptor {
    pub instance_id: u32,
    pub value: Option<String>,
    pub is_set: bool,
    pub allow_default_if_unset: bool,
    pub is_fixed: bool,
}

impl AttributeDescriptor {
    fn new(instance_id: u32, value: Option<&str>) -> Self {
        Self {
            instance_id,
            value: value.map(str::to_string),
            is_set: value.is_some(),
            allow_default_if_unset: false,
            is_fixed: false,
        }
    }
}

/// JSON body describing a [`Selection`] to the discovery endpoint.
///
/// Always carries seven descriptors: lighting, camera, format and ISO in
/// that order, followed by the three placeholders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscoveryPayload {
    pub scene_id: u32,
    pub include_images: bool,
    pub attributes: Vec<AttributeDescriptor>,
}

impl DiscoveryPayload {
    /// Builds the payload for `selection`.
    #[must_use]
    pub fn for_selection(selection: &Selection) -> Self {
        let selectable = Level::ALL
            .iter()
            .map(|&level| AttributeDescriptor::new(level.instance_id(), selection.value(level)));
        let placeholders = PLACEHOLDER_INSTANCE_IDS
            .iter()
            .map(|&id| AttributeDescriptor::new(id, None));

        Self {
            scene_id: SCENE_ID,
            include_images: true,
            attributes: selectable.chain(placeholders).collect(),
        }
    }

    /// Compact JSON encoding of the payload.
    ///
    /// # Errors
    ///
    /// Returns the serializer error; not expected for this plain structure.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// `application/x-www-form-urlencoded` body with the JSON in field `data`.
    ///
    /// # Errors
    ///
    /// Returns the serializer error from [`to_json`](Self::to_json).
    pub fn to_form_body(&self) -> Result<String, serde_json::Error> {
        let json = self.to_json()?;
        Ok(format!("data={}", urlencoding::encode(&json)))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::api::AttributeValue;

    fn selection_with(values: &[&str]) -> Selection {
        values.iter().fold(Selection::new(), |selection, v| {
            selection
                .with_next(&AttributeValue {
                    client_value: (*v).to_string(),
                    display_value: String::new(),
                })
                .unwrap()
        })
    }

    #[test]
    fn test_payload_marks_exactly_the_set_prefix() {
        let values = ["Daylight", "canon_eos5d", "RAW", "100"];
        for k in 0..=values.len() {
            let payload = DiscoveryPayload::for_selection(&selection_with(&values[..k]));
            assert_eq!(payload.attributes.len(), 7);
            for (i, descriptor) in payload.attributes.iter().enumerate() {
                if i < k {
                    assert!(descriptor.is_set, "k={k}: field {i} should be set");
                    assert_eq!(descriptor.value.as_deref(), Some(values[i]));
                } else {
                    assert!(!descriptor.is_set, "k={k}: field {i} should be unset");
                    assert_eq!(descriptor.value, None);
                }
            }
        }
    }

    #[test]
    fn test_payload_instance_ids_in_order() {
        let payload = DiscoveryPayload::for_selection(&Selection::new());
        let ids: Vec<u32> = payload.attributes.iter().map(|d| d.instance_id).collect();
        assert_eq!(ids, vec![18, 13, 15, 16, 126, 171, 199]);
    }

    #[test]
    fn test_payload_json_shape() {
        let payload = DiscoveryPayload::for_selection(&selection_with(&["Daylight"]));
        let json = payload.to_json().unwrap();

        assert!(json.starts_with(r#"{"sceneId":1,"includeImages":true,"attributes":["#));
        assert!(json.contains(
            r#"{"instanceId":18,"value":"Daylight","isSet":true,"allowDefaultIfUnset":false,"isFixed":false}"#
        ));
        assert!(json.contains(
            r#"{"instanceId":13,"value":null,"isSet":false,"allowDefaultIfUnset":false,"isFixed":false}"#
        ));
        assert!(!json.contains(' '), "JSON must be compact: {json}");
    }

    #[test]
    fn test_form_body_round_trips_through_decoding() {
        let payload = DiscoveryPayload::for_selection(&selection_with(&["Low Light", "a&b"]));
        let body = payload.to_form_body().unwrap();

        let encoded = body.strip_prefix("data=").unwrap();
        assert!(!encoded.contains('&'), "field value must be percent-encoded");
        let decoded = urlencoding::decode(encoded).unwrap();
        assert_eq!(decoded, payload.to_json().unwrap());
    }
}
