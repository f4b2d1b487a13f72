//! Shared utilities for integration tests: a fake of the studio scene API.
//!
//! [`SceneResponder`] answers discovery POSTs from a fixed attribute tree and
//! [`AssetResponder`] serves asset GETs, naming each file after its `s3Key`.

#![allow(dead_code)]

pub mod socket_guard;

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use serde_json::{Value, json};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};

pub const DISCOVERY_PATH: &str = "/reviews/image-comparison/get-images";
pub const ASSET_PATH: &str = "/reviews/image-comparison/download-image";

/// Attribute tree of the fake scene. Every lighting offers the same cameras,
/// every camera the same formats, every format the same ISO values.
#[derive(Debug, Clone)]
pub struct Scene {
    pub lightings: Vec<&'static str>,
    pub cameras: Vec<(&'static str, &'static str)>,
    pub formats: Vec<&'static str>,
    pub isos: Vec<&'static str>,
    /// Leaf responses carry no images when false.
    pub with_images: bool,
}

impl Default for Scene {
    fn default() -> Self {
        Self {
            lightings: vec!["Daylight", "Lowlight"],
            cameras: vec![("canon_eos5d", "Canon EOS 5D"), ("nikon_d850", "Nikon D850")],
            formats: vec!["RAW", "JPEG"],
            isos: vec!["100", "200"],
            with_images: true,
        }
    }
}

impl Scene {
    pub fn leaf_count(&self) -> usize {
        self.lightings.len() * self.cameras.len() * self.formats.len() * self.isos.len()
    }

    fn group(&self, index: usize) -> Value {
        let values: Vec<Value> = match index {
            0 => self.lightings.iter().map(|v| plain(v)).collect(),
            1 => self
                .cameras
                .iter()
                .map(|(client, display)| json!({"clientValue": client, "displayValue": display}))
                .collect(),
            2 => self.formats.iter().map(|v| plain(v)).collect(),
            3 => self.isos.iter().map(|v| plain(v)).collect(),
            _ => Vec::new(),
        };
        json!({ "values": values })
    }

    /// Discovery answer for a request with `selected` values set.
    pub fn answer(&self, selected: &[String]) -> Value {
        let depth = selected.len();
        let attributes: Vec<Value> = (0..4)
            .map(|i| if i == depth { self.group(i) } else { json!({"values": []}) })
            .collect();
        let images = if depth == 4 && self.with_images {
            let key = asset_key(selected);
            vec![json!({
                "originalUrl": format!("{ASSET_PATH}?s3Key={key}.cr2"),
                "displayImageUrl": format!("{ASSET_PATH}?s3Key={key}.acr.jpg"),
            })]
        } else {
            Vec::new()
        };
        json!({ "attributes": attributes, "images": images })
    }
}

fn plain(value: &str) -> Value {
    json!({ "clientValue": value, "displayValue": value })
}

/// Storage key of a leaf's assets: its values joined with `-`, lowercased.
pub fn asset_key(selected: &[String]) -> String {
    selected.join("-").to_lowercase()
}

/// Set values of the `data` form field of a discovery request, in order.
pub fn selected_values(request: &Request) -> Vec<String> {
    let body = String::from_utf8_lossy(&request.body);
    let encoded = body.strip_prefix("data=").unwrap_or(&body);
    let json = urlencoding::decode(encoded).expect("data field must be percent-encoded");
    let payload: Value = serde_json::from_str(&json).expect("data field must be JSON");
    payload["attributes"]
        .as_array()
        .expect("attributes array")
        .iter()
        .take_while(|descriptor| descriptor["isSet"] == true)
        .map(|descriptor| descriptor["value"].as_str().unwrap_or_default().to_string())
        .collect()
}

/// Answers discovery POSTs from a [`Scene`], optionally rate limiting the
/// first few requests.
pub struct SceneResponder {
    pub scene: Scene,
    pub rate_limited_first: usize,
    pub calls: Arc<AtomicUsize>,
}

impl SceneResponder {
    pub fn new(scene: Scene) -> Self {
        Self {
            scene,
            rate_limited_first: 0,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }
}

impl Respond for SceneResponder {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        let n = self.calls.fetch_add(1, Ordering::SeqCst);
        if n < self.rate_limited_first {
            return ResponseTemplate::new(429);
        }
        let selected = selected_values(request);
        ResponseTemplate::new(200).set_body_json(self.scene.answer(&selected))
    }
}

/// Serves any asset, named by its `s3Key` through `Content-Disposition`.
pub struct AssetResponder;

impl Respond for AssetResponder {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        let key = request
            .url
            .query_pairs()
            .find(|(name, _)| name == "s3Key")
            .map(|(_, value)| value.into_owned())
            .unwrap_or_else(|| "missing".to_string());
        ResponseTemplate::new(200)
            .insert_header("Content-Disposition", format!("attachment; filename=\"{key}\"").as_str())
            .set_body_bytes(key.into_bytes())
    }
}

/// Mounts discovery and asset endpoints for `responder` on `server`.
pub async fn mount_scene(server: &MockServer, responder: SceneResponder) {
    Mock::given(method("POST"))
        .and(path(DISCOVERY_PATH))
        .respond_with(responder)
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path(ASSET_PATH))
        .respond_with(AssetResponder)
        .mount(server)
        .await;
}

/// Number of requests `server` received with `http_method`.
pub async fn count_requests(server: &MockServer, http_method: &str) -> usize {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .filter(|request| request.method.as_str() == http_method)
        .count()
}
