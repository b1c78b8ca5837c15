//! Registry of pose schemas keyed by id.

use biomech_types::PoseLandmark;
use hashbrown::HashMap;
use tracing::debug;

use crate::builtin;
use crate::error::{Result, SchemaError};
use crate::schema::PoseSchema;

/// Resolves semantic landmark names for any registered pose backend.
///
/// The registry is an ordinary value. Build it once, wrap it in an `Arc` and
/// hand it to the components that need it.
///
/// # Example
///
/// ```
/// use biomech_schema::{PoseSchemaRegistry, MOVENET_17};
///
/// let registry = PoseSchemaRegistry::with_builtin();
/// assert_eq!(registry.resolve(MOVENET_17, "left_elbow").unwrap(), 7);
/// assert!(registry.resolve(MOVENET_17, "left_pinky").is_err());
/// assert!(registry.resolve("unknown", "nose").is_err());
/// ```
#[derive(Debug, Clone, Default)]
pub struct PoseSchemaRegistry {
    schemas: HashMap<String, PoseSchema>,
}

impl PoseSchemaRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry holding `movenet_17` and `mediapipe_33`.
    #[must_use]
    pub fn with_builtin() -> Self {
        let mut registry = Self::new();
        for schema in builtin::all() {
            registry.register(schema);
        }
        registry
    }

    /// Registers a schema. A schema already registered under the same id is
    /// replaced and returned.
    pub fn register(&mut self, schema: PoseSchema) -> Option<PoseSchema> {
        let id = schema.id().to_string();
        let landmark_count = schema.len();
        let previous = self.schemas.insert(id.clone(), schema);
        if previous.is_some() {
            debug!(schema = %id, landmark_count, "replaced pose schema");
        } else {
            debug!(schema = %id, landmark_count, "registered pose schema");
        }
        previous
    }

    /// Looks up a schema by id.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::UnknownSchema`] if no schema has this id.
    pub fn schema(&self, schema_id: &str) -> Result<&PoseSchema> {
        self.schemas
            .get(schema_id)
            .ok_or_else(|| SchemaError::unknown_schema(schema_id))
    }

    /// Returns `true` if a schema is registered under this id.
    #[must_use]
    pub fn contains(&self, schema_id: &str) -> bool {
        self.schemas.contains_key(schema_id)
    }

    /// Registered ids, sorted.
    #[must_use]
    pub fn schema_ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.schemas.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }

    /// Resolves a landmark name to its slot index.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::UnknownSchema`] or
    /// [`SchemaError::LandmarkNotFound`].
    pub fn resolve(&self, schema_id: &str, name: &str) -> Result<usize> {
        let schema = self.schema(schema_id)?;
        schema
            .index_of(name)
            .ok_or_else(|| SchemaError::landmark_not_found(schema_id, name))
    }

    /// Returns the slot indices of a named group.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::UnknownSchema`] or
    /// [`SchemaError::GroupNotFound`].
    pub fn group(&self, schema_id: &str, group: &str) -> Result<&[usize]> {
        let schema = self.schema(schema_id)?;
        schema
            .group(group)
            .ok_or_else(|| SchemaError::group_not_found(schema_id, group))
    }

    /// Resolves a landmark name and fetches it from a frame of landmarks.
    ///
    /// # Errors
    ///
    /// Returns the [`Self::resolve`] errors, or
    /// [`SchemaError::LandmarkMissing`] if the frame is shorter than the
    /// schema expects.
    pub fn landmark<'a>(
        &self,
        schema_id: &str,
        landmarks: &'a [PoseLandmark],
        name: &str,
    ) -> Result<&'a PoseLandmark> {
        let index = self.resolve(schema_id, name)?;
        landmarks
            .get(index)
            .ok_or_else(|| SchemaError::landmark_missing(name, index, landmarks.len()))
    }
}
