//! Response types of the discovery endpoint.

use serde::Deserialize;

use super::ApiError;
use crate::selection::{Level, Selection};

/// One legal value at a level.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttributeValue {
    /// Machine value sent back in later requests.
    pub client_value: String,
    /// Human-readable label (camera model names).
    #[serde(default)]
    pub display_value: String,
}

impl AttributeValue {
    /// Label for directory names and logs; the client value when no label is given.
    #[must_use]
    pub fn display_name(&self) -> &str {
        if self.display_value.is_empty() {
            &self.client_value
        } else {
            &self.display_value
        }
    }
}

/// Values of one attribute level.
///
/// `values` is required: an explicit empty list means the level has no
/// legal values, while a group without the key fails to decode.
#[derive(Debug, Clone, Deserialize)]
pub struct AttributeGroup {
    pub values: Vec<AttributeValue>,
}

/// One image entry of a leaf response; both fields are server-relative paths.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageEntry {
    pub original_url: String,
    pub display_image_url: String,
}

/// Downloadable assets for a leaf selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetPair {
    /// Processed image shown by the widget.
    pub display: String,
    /// Original file as produced by the camera.
    pub original: String,
}

/// Body of a discovery response.
///
/// `attributes` is positional: lighting, camera, format, ISO. `images` is
/// only meaningful when the request selected all four levels.
#[derive(Debug, Clone, Deserialize)]
pub struct AttributeResponse {
    pub attributes: Vec<AttributeGroup>,
    #[serde(default)]
    pub images: Vec<ImageEntry>,
}

impl AttributeResponse {
    /// Legal values for `level`, in API order.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::MissingAttributeGroup`] when the response has no
    /// group at the level's position.
    pub fn values_for(&self, level: Level) -> Result<&[AttributeValue], ApiError> {
        self.attributes
            .get(level.attribute_index())
            .map(|group| group.values.as_slice())
            .ok_or(ApiError::MissingAttributeGroup { level })
    }

    /// Asset URLs of the first image entry.
    ///
    /// Only the first entry is consulted; leaf responses are expected to list
    /// exactly one relevant image.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::MissingImage`] when the image list is empty.
    pub fn asset_pair(&self, selection: &Selection) -> Result<AssetPair, ApiError> {
        let image = self.images.first().ok_or_else(|| ApiError::MissingImage {
            selection: selection.to_string(),
        })?;
        Ok(AssetPair {
            display: image.display_image_url.clone(),
            original: image.original_url.clone(),
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const CAMERA_RESPONSE: &str = r#"{
        "attributes": [
            {"values": [{"clientValue": "Daylight", "displayValue": "Daylight"}]},
            {"values": [
                {"clientValue": "canon_eos5d", "displayValue": "Canon EOS 5D"},
                {"clientValue": "nikon_d850", "displayValue": "Nikon D850", "extra": 1}
            ]},
            {"values": []},
            {"values": []}
        ],
        "sceneName": "studio"
    }"#;

    #[test]
    fn test_values_for_reads_positional_group() {
        let response: AttributeResponse = serde_json::from_str(CAMERA_RESPONSE).unwrap();
        let cameras = response.values_for(Level::Camera).unwrap();
        assert_eq!(cameras.len(), 2);
        assert_eq!(cameras[0].client_value, "canon_eos5d");
        assert_eq!(cameras[1].display_name(), "Nikon D850");
    }

    #[test]
    fn test_values_for_explicit_empty_list_has_no_values() {
        let response: AttributeResponse = serde_json::from_str(CAMERA_RESPONSE).unwrap();
        assert!(response.values_for(Level::Format).unwrap().is_empty());
        assert!(response.values_for(Level::Iso).unwrap().is_empty());
    }

    #[test]
    fn test_group_without_values_key_fails_to_decode() {
        let result = serde_json::from_str::<AttributeResponse>(
            r#"{"attributes": [{"values": []}, {"unexpected": 1}]}"#,
        );
        let err = result.unwrap_err();
        assert!(err.to_string().contains("values"), "unexpected error: {err}");
    }

    #[test]
    fn test_value_without_client_value_fails_to_decode() {
        let result = serde_json::from_str::<AttributeResponse>(
            r#"{"attributes": [{"values": [{"displayValue": "Daylight"}]}]}"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_values_for_missing_group_is_error() {
        let response: AttributeResponse =
            serde_json::from_str(r#"{"attributes": [{"values": []}]}"#).unwrap();
        let err = response.values_for(Level::Camera).unwrap_err();
        assert!(matches!(
            err,
            ApiError::MissingAttributeGroup {
                level: Level::Camera
            }
        ));
    }

    #[test]
    fn test_missing_attributes_key_fails_to_decode() {
        assert!(serde_json::from_str::<AttributeResponse>(r#"{"images": []}"#).is_err());
    }

    #[test]
    fn test_asset_pair_uses_first_image_only() {
        let response: AttributeResponse = serde_json::from_str(
            r#"{
                "attributes": [],
                "images": [
                    {"originalUrl": "/dl?s3Key=a.cr2", "displayImageUrl": "/dl?s3Key=a.acr.jpg"},
                    {"originalUrl": "/dl?s3Key=b.cr2", "displayImageUrl": "/dl?s3Key=b.acr.jpg"}
                ]
            }"#,
        )
        .unwrap();

        let pair = response.asset_pair(&Selection::new()).unwrap();
        assert_eq!(pair.original, "/dl?s3Key=a.cr2");
        assert_eq!(pair.display, "/dl?s3Key=a.acr.jpg");
    }

    #[test]
    fn test_asset_pair_without_images_is_error() {
        let response: AttributeResponse = serde_json::from_str(r#"{"attributes": []}"#).unwrap();
        assert!(matches!(
            response.asset_pair(&Selection::new()),
            Err(ApiError::MissingImage { .. })
        ));
    }

    #[test]
    fn test_display_name_falls_back_to_client_value() {
        let value: AttributeValue = serde_json::from_str(r#"{"clientValue": "RAW"}"#).unwrap();
        assert_eq!(value.display_name(), "RAW");
    }
}
