use serde::{Deserialize, Serialize};
use std::collections::HashMap;

fn is_false(value: &bool) -> bool {
    !*value
}

fn is_default<T: Default + PartialEq>(value: &T) -> bool {
    *value == T::default()
}

/// Reference to the build configuration a queued build belongs to
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BuildTypeReference {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub id: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub project_name: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub project_id: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub href: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub web_url: String,
}

/// Information about the trigger that put a build in the queue
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QueueTriggered {
    /// Trigger kind, e.g. `user`, `vcs` or `schedule`
    #[serde(rename = "type")]
    pub kind: String,
    pub date: String,
}

/// A build that is on the queue, as reported by the server
///
/// See <https://www.jetbrains.com/help/teamcity/rest/build.html> for the full
/// list of properties. Fields the server leaves out stay at their defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct QueuedBuild {
    #[serde(skip_serializing_if = "is_zero")]
    pub id: i64,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub build_type_id: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub status: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub status_text: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub state: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub href: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub web_url: String,
    #[serde(skip_serializing_if = "is_default")]
    pub build_type: BuildTypeReference,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub wait_reason: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub queued_date: String,
    #[serde(skip_serializing_if = "is_default")]
    pub triggered: QueueTriggered,
}

fn is_zero(value: &i64) -> bool {
    *value == 0
}

impl QueuedBuild {
    /// Build ID as a string, suitable for a status lookup
    pub fn get_id(&self) -> String {
        self.id.to_string()
    }
}

/// Type descriptor of a property
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PropertyType {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub raw_value: String,
}

/// A single name/value pair passed to a build
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Property {
    pub name: String,
    #[serde(default)]
    pub value: String,
    #[serde(default, skip_serializing_if = "is_false")]
    pub inherited: bool,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub property_type: Option<PropertyType>,
}

impl Property {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            ..Self::default()
        }
    }
}

#[derive(Serialize)]
struct PropertiesWire<'a> {
    count: usize,
    property: &'a [Property],
}

#[derive(Deserialize)]
struct PropertiesRaw {
    #[serde(default)]
    property: Vec<Property>,
}

/// Property bag in the server's wire shape: `{"count": N, "property": [...]}`
///
/// Names are unique; adding a property whose name is already present replaces
/// it. `count` is derived from the items on serialization. Two bags are equal
/// when they hold the same properties, whatever the insertion order.
#[derive(Debug, Clone, Default, Eq)]
pub struct Properties {
    items: Vec<Property>,
}

impl PartialEq for Properties {
    fn eq(&self, other: &Self) -> bool {
        // Names are unique, so equal length plus containment means the same set.
        self.items.len() == other.items.len() && self.items.iter().all(|p| other.items.contains(p))
    }
}

impl Serialize for Properties {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        PropertiesWire {
            count: self.items.len(),
            property: &self.items,
        }
        .serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Properties {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = PropertiesRaw::deserialize(deserializer)?;
        Ok(raw.property.into_iter().collect())
    }
}

impl Properties {
    /// Create an empty property bag
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `name` to `value`, replacing any existing property with that name
    pub fn add_or_replace_value(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.add_or_replace_property(Property::new(name, value));
    }

    pub fn add_or_replace_property(&mut self, property: Property) {
        match self.items.iter_mut().find(|p| p.name == property.name) {
            Some(existing) => *existing = property,
            None => self.items.push(property),
        }
    }

    /// Remove the property called `name`, returning it if it was present
    pub fn remove(&mut self, name: &str) -> Option<Property> {
        let index = self.items.iter().position(|p| p.name == name)?;
        Some(self.items.remove(index))
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.items
            .iter()
            .find(|p| p.name == name)
            .map(|p| p.value.as_str())
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Property> {
        self.items.iter()
    }

    /// Name to value view of the bag
    pub fn map(&self) -> HashMap<String, String> {
        self.items
            .iter()
            .map(|p| (p.name.clone(), p.value.clone()))
            .collect()
    }
}

impl FromIterator<Property> for Properties {
    fn from_iter<I: IntoIterator<Item = Property>>(iter: I) -> Self {
        let mut properties = Properties::new();
        for property in iter {
            properties.add_or_replace_property(property);
        }
        properties
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Properties {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        iter.into_iter()
            .map(|(name, value)| Property::new(name, value))
            .collect()
    }
}

/// Parameters to put a build in the queue
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TriggerBuildRequest {
    pub build_type_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branch_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub properties: Option<Properties>,
}

impl TriggerBuildRequest {
    /// Create a request for `build_type_id`. Nothing is validated locally.
    pub fn new(build_type_id: impl Into<String>, properties: Option<Properties>) -> Self {
        Self {
            build_type_id: build_type_id.into(),
            branch_name: None,
            properties,
        }
    }

    /// Run the build on `branch` instead of the default branch
    pub fn with_branch(mut self, branch: impl Into<String>) -> Self {
        self.branch_name = Some(branch.into());
        self
    }
}
