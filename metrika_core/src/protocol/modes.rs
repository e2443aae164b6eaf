/**
 * Hit modes — the flags that end up in the `browser-info` token.
 *
 * A `HitModes` value is an ordered map from a short flag name to a
 * `ModeValue`. Order matters: tokens are emitted in insertion order, and
 * re-assigning an existing key keeps its original position.
 *
 * The `ut` (indexing directive) entry is special: it never becomes a
 * `browser-info` token and is sent as its own form field instead.
 */
use std::borrow::Cow;

// ---------------------------------------------------------------------------
// Known flag names
// ---------------------------------------------------------------------------

/// "Arrived" marker. Present exactly once in every hit.
pub const ARRIVED: &str = "ar";

/// The hit is a link click.
pub const LINK: &str = "ln";

/// The hit is a file download.
pub const DOWNLOAD: &str = "dl";

/// The visit is not a bounce.
pub const NOT_BOUNCE: &str = "nb";

/// The hit carries visit parameters only.
pub const PARAMS: &str = "pa";

/// Indexing directive, e.g. `noindex`.
pub const INDEX: &str = "ut";

// ---------------------------------------------------------------------------
// ModeValue
// ---------------------------------------------------------------------------

/**
 * Value of a single mode entry.
 *
 * - `Flag` — the flag is set; rendered as `1`.
 * - `Value(s)` — the flag carries a payload. Empty strings and `"0"` count
 *   as unset, the same way the collector's reference client treats them.
 * - `Absent` — the key is known but unset.
 */
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ModeValue {
    Flag,
    Value(String),
    Absent,
}

impl ModeValue {
    /// Whether this entry produces a token (or, for `ut`, a form field).
    pub fn is_set(&self) -> bool {
        match self {
            ModeValue::Flag => true,
            ModeValue::Value(s) => !s.is_empty() && s != "0",
            ModeValue::Absent => false,
        }
    }

    /// Wire rendering of a set value. `None` for unset values.
    pub fn render(&self) -> Option<Cow<'_, str>> {
        if !self.is_set() {
            return None;
        }
        match self {
            ModeValue::Flag => Some(Cow::Borrowed("1")),
            ModeValue::Value(s) => Some(Cow::Borrowed(s.as_str())),
            ModeValue::Absent => None,
        }
    }
}

impl From<bool> for ModeValue {
    fn from(value: bool) -> Self {
        if value {
            ModeValue::Flag
        } else {
            ModeValue::Absent
        }
    }
}

impl From<&str> for ModeValue {
    fn from(value: &str) -> Self {
        ModeValue::Value(value.to_string())
    }
}

impl From<String> for ModeValue {
    fn from(value: String) -> Self {
        ModeValue::Value(value)
    }
}

impl From<u32> for ModeValue {
    fn from(value: u32) -> Self {
        ModeValue::Value(value.to_string())
    }
}

impl<T: Into<ModeValue>> From<Option<T>> for ModeValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(ModeValue::Absent, Into::into)
    }
}

// ---------------------------------------------------------------------------
// HitModes
// ---------------------------------------------------------------------------

/// Ordered set of mode flags for one hit. Built fresh for every call.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct HitModes {
    entries: Vec<(String, ModeValue)>,
}

impl HitModes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`HitModes::set`].
    pub fn with(mut self, key: impl Into<String>, value: impl Into<ModeValue>) -> Self {
        self.set(key, value);
        self
    }

    /**
     * Assigns `value` to `key`.
     *
     * An existing key is updated in place so its position in the token
     * list does not change; a new key is appended.
     */
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<ModeValue>) {
        let key = key.into();
        let value = value.into();

        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&ModeValue> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }

    /// `true` when no keys were assigned at all, set or not.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ModeValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /**
     * Returns these modes with the `ar` marker forced on.
     *
     * Two paths with the same observable result:
     * - empty modes are replaced by `{ar}`;
     * - non-empty modes get `ar = Flag`, overwriting a caller value in place,
     *   otherwise placed ahead of the caller's entries so their tokens stay
     *   contiguous with the trailing `en` token.
     */
    pub fn with_arrival(mut self) -> Self {
        if self.is_empty() {
            return HitModes::new().with(ARRIVED, ModeValue::Flag);
        }

        if self.get(ARRIVED).is_some() {
            self.set(ARRIVED, ModeValue::Flag);
        } else {
            self.entries.insert(0, (ARRIVED.to_string(), ModeValue::Flag));
        }
        self
    }

    /// The `ut` value to send as a separate form field, if set.
    pub fn index_directive(&self) -> Option<Cow<'_, str>> {
        self.get(INDEX).and_then(ModeValue::render)
    }

    /// `name:value` tokens for every set entry except `ut`, in order.
    pub fn tokens(&self) -> impl Iterator<Item = String> + '_ {
        self.iter()
            .filter(|(key, _)| *key != INDEX)
            .filter_map(|(key, value)| value.render().map(|v| format!("{key}:{v}")))
    }
}
