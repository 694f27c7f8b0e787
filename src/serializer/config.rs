// ============================================================================
// Serializer Configuration
// ============================================================================

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SerializerConfig {
    /// Reject envelopes carrying keys other than `class` and `payload`
    pub strict_envelope: bool,
}

impl Default for SerializerConfig {
    fn default() -> Self {
        Self {
            strict_envelope: false,
        }
    }
}

impl SerializerConfig {
    /// Only exact `{class, payload}` envelopes are accepted
    pub fn strict() -> Self {
        Self {
            strict_envelope: true,
        }
    }

    /// Extra envelope keys are ignored
    pub fn lenient() -> Self {
        Self::default()
    }
}
