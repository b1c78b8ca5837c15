//! A single landmark schema: ordered slots plus named groups.

use hashbrown::HashMap;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{Result, SchemaError};

/// Maps semantic landmark names to the slot indices of one pose backend.
///
/// # Example
///
/// ```
/// use biomech_schema::PoseSchema;
///
/// let schema = PoseSchema::new("tiny", ["nose", "left_shoulder", "left_elbow"])
///     .unwrap()
///     .with_group("left_arm", &["left_shoulder", "left_elbow"])
///     .unwrap();
///
/// assert_eq!(schema.index_of("left_elbow"), Some(2));
/// assert_eq!(schema.group("left_arm"), Some(&[1, 2][..]));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoseSchema {
    id: String,
    names: Vec<String>,
    index: HashMap<String, usize>,
    groups: HashMap<String, Vec<usize>>,
}

impl PoseSchema {
    /// Creates a schema from slot names in backend order.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::InvalidSchema`] if the id is empty or a name
    /// appears twice.
    pub fn new<I, S>(id: impl Into<String>, names: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(SchemaError::invalid_schema("schema id must not be empty"));
        }
        let names: Vec<String> = names.into_iter().map(Into::into).collect();
        let mut index = HashMap::with_capacity(names.len());
        for (i, name) in names.iter().enumerate() {
            if index.insert(name.clone(), i).is_some() {
                return Err(SchemaError::invalid_schema(format!(
                    "duplicate landmark '{name}' in schema '{id}'"
                )));
            }
        }
        Ok(Self {
            id,
            names,
            index,
            groups: HashMap::new(),
        })
    }

    // Infallible constructor for tables already known to be consistent.
    pub(crate) fn from_parts(
        id: &str,
        names: Vec<String>,
        groups: impl IntoIterator<Item = (String, Vec<usize>)>,
    ) -> Self {
        let index = names.iter().enumerate().map(|(i, n)| (n.clone(), i)).collect();
        Self {
            id: id.to_string(),
            names,
            index,
            groups: groups.into_iter().collect(),
        }
    }

    /// Adds (or replaces) a named group of landmarks.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::LandmarkNotFound`] if a member is not a slot
    /// of this schema.
    pub fn with_group(mut self, name: impl Into<String>, members: &[&str]) -> Result<Self> {
        let indices = members
            .iter()
            .map(|m| {
                self.index_of(m)
                    .ok_or_else(|| SchemaError::landmark_not_found(&self.id, *m))
            })
            .collect::<Result<Vec<_>>>()?;
        self.groups.insert(name.into(), indices);
        Ok(self)
    }

    /// Builds a schema from a serializable definition.
    ///
    /// # Errors
    ///
    /// Propagates [`Self::new`] and [`Self::with_group`] failures.
    pub fn from_definition(definition: &SchemaDefinition) -> Result<Self> {
        let mut schema = Self::new(definition.id.clone(), definition.landmarks.iter().cloned())?;
        for group in &definition.groups {
            let members: Vec<&str> = group.members.iter().map(String::as_str).collect();
            schema = schema.with_group(group.name.clone(), &members)?;
        }
        Ok(schema)
    }

    /// Converts back into a definition. Groups are sorted by name.
    #[must_use]
    pub fn to_definition(&self) -> SchemaDefinition {
        let mut groups: Vec<LandmarkGroup> = self
            .groups
            .iter()
            .map(|(name, indices)| LandmarkGroup {
                name: name.clone(),
                members: indices.iter().map(|&i| self.names[i].clone()).collect(),
            })
            .collect();
        groups.sort_by(|a, b| a.name.cmp(&b.name));
        SchemaDefinition {
            id: self.id.clone(),
            landmarks: self.names.clone(),
            groups,
        }
    }

    /// Schema id.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Number of landmark slots.
    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Returns `true` if the schema has no slots.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Slot names in backend order.
    #[must_use]
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Index of a named landmark.
    #[must_use]
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    /// Name of the landmark in a slot.
    #[must_use]
    pub fn name_of(&self, index: usize) -> Option<&str> {
        self.names.get(index).map(String::as_str)
    }

    /// Returns `true` if every name is a slot of this schema.
    #[must_use]
    pub fn contains_all(&self, names: &[&str]) -> bool {
        names.iter().all(|n| self.index.contains_key(*n))
    }

    /// Indices of a named group.
    #[must_use]
    pub fn group(&self, name: &str) -> Option<&[usize]> {
        self.groups.get(name).map(Vec::as_slice)
    }

    /// Group names, sorted.
    #[must_use]
    pub fn group_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.groups.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

/// Serializable description of a schema, for loading custom backends.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SchemaDefinition {
    /// Schema id.
    pub id: String,
    /// Slot names in backend order.
    pub landmarks: Vec<String>,
    /// Named groups.
    #[cfg_attr(feature = "serde", serde(default))]
    pub groups: Vec<LandmarkGroup>,
}

/// A named group inside a [`SchemaDefinition`].
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LandmarkGroup {
    /// Group name, e.g. `"left_arm"`.
    pub name: String,
    /// Member landmark names.
    pub members: Vec<String>,
}
