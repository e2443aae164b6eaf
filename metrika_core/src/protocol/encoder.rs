/**
 * Hit encoder — turns a `HitPayload` into the form fields the collector
 * expects.
 *
 * Field order on the wire:
 *
 * ```text
 * cnt-class   counter class, only when non-zero
 * page-url    percent-encoded page URL, when present
 * page-ref    percent-encoded referrer, when present
 * browser-info  always; "ar:1[:<modes>]:en:<encoding>[:t:<title>]"
 * site-info   percent-encoded JSON of the visit parameters, when present
 * ut          indexing directive, verbatim, when set
 * ```
 *
 * No field is ever emitted with an empty value.
 */
use serde_json::Value;
use url::form_urlencoded;

use super::modes::HitModes;

// ---------------------------------------------------------------------------
// HitPayload — one event, with URLs already resolved
// ---------------------------------------------------------------------------

/// Everything one hit says about the event. Empty strings mean "not set".
#[derive(Clone, Debug, Default, PartialEq)]
pub struct HitPayload {
    /// Absolute page URL, or a synthetic `goal://` URL.
    pub page_url: String,

    /// Absolute referrer URL.
    pub referrer: String,

    pub title: String,

    /// Visit parameters: an arbitrary JSON tree.
    pub params: Option<Value>,

    pub modes: HitModes,
}

// ---------------------------------------------------------------------------
// WireFields — the encoded form body
// ---------------------------------------------------------------------------

/// Ordered, already percent-encoded form fields of one hit.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct WireFields {
    fields: Vec<(&'static str, String)>,
}

impl WireFields {
    fn push(&mut self, name: &'static str, value: String) {
        if !value.is_empty() {
            self.fields.push((name, value));
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.fields.iter().map(|(n, _)| *n)
    }

    /// `key=value&key=value` request body.
    pub fn to_body(&self) -> String {
        self.fields
            .iter()
            .map(|(name, value)| format!("{name}={value}"))
            .collect::<Vec<_>>()
            .join("&")
    }
}

// ---------------------------------------------------------------------------
// Encoder
// ---------------------------------------------------------------------------

/// Encodes payloads for one counter. Holds the per-counter constants.
#[derive(Clone, Debug)]
pub struct Encoder {
    counter_class: u32,
    encoding: String,
}

impl Encoder {
    pub fn new(counter_class: u32, encoding: impl Into<String>) -> Self {
        Self {
            counter_class,
            encoding: encoding.into(),
        }
    }

    pub fn encode(&self, payload: &HitPayload) -> WireFields {
        let mut fields = WireFields::default();

        if self.counter_class != 0 {
            fields.push("cnt-class", self.counter_class.to_string());
        }

        fields.push("page-url", percent_encode(&payload.page_url));
        fields.push("page-ref", percent_encode(&payload.referrer));

        let modes = payload.modes.clone().with_arrival();
        fields.push("browser-info", self.browser_info(&modes, &payload.title));

        if let Some(params) = payload.params.as_ref().filter(|p| !is_blank(p)) {
            fields.push("site-info", percent_encode(&params.to_string()));
        }

        if let Some(directive) = modes.index_directive() {
            fields.push("ut", directive.into_owned());
        }

        fields
    }

    /// Colon-joined `browser-info` tokens: mode flags, `en`, then `t`.
    fn browser_info(&self, modes: &HitModes, title: &str) -> String {
        let mut tokens: Vec<String> = modes.tokens().collect();

        tokens.push(format!("en:{}", self.encoding));

        if !title.is_empty() {
            tokens.push(format!("t:{}", percent_encode(title)));
        }

        tokens.join(":")
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// `application/x-www-form-urlencoded` encoding: space becomes `+`.
pub fn percent_encode(value: &str) -> String {
    form_urlencoded::byte_serialize(value.as_bytes()).collect()
}

/**
 * Whether a parameter tree carries nothing worth sending: `null`, `false`,
 * zero, an empty string, an empty array or an empty object.
 */
pub fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(a) => a.is_empty(),
        Value::Object(o) => o.is_empty(),
    }
}
