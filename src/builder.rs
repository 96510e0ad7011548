use crate::types::{Properties, Property, TriggerBuildRequest};

/// Builder for constructing trigger requests with a fluent API
#[derive(Debug, Default)]
pub struct TriggerBuildRequestBuilder {
    build_type_id: String,
    branch_name: Option<String>,
    properties: Properties,
}

impl TriggerBuildRequestBuilder {
    /// Start a request for the given build configuration
    pub fn new(build_type_id: impl Into<String>) -> Self {
        Self {
            build_type_id: build_type_id.into(),
            ..Self::default()
        }
    }

    /// Set the branch to build
    ///
    /// # Example
    ///
    /// ```
    /// use teamcity_queue::TriggerBuildRequestBuilder;
    ///
    /// let request = TriggerBuildRequestBuilder::new("Project_Build")
    ///     .branch("refs/heads/main")
    ///     .build();
    /// assert_eq!(request.branch_name.as_deref(), Some("refs/heads/main"));
    /// ```
    pub fn branch(mut self, branch: impl Into<String>) -> Self {
        self.branch_name = Some(branch.into());
        self
    }

    /// Add a build parameter, replacing an earlier one with the same name
    ///
    /// # Example
    ///
    /// ```
    /// use teamcity_queue::TriggerBuildRequestBuilder;
    ///
    /// let request = TriggerBuildRequestBuilder::new("Project_Build")
    ///     .property("env.DEPLOY", "false")
    ///     .property("env.DEPLOY", "true")
    ///     .build();
    /// assert_eq!(request.properties.unwrap().get("env.DEPLOY"), Some("true"));
    /// ```
    pub fn property(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.properties.add_or_replace_value(name, value);
        self
    }

    /// Merge a whole property bag into the request
    pub fn properties(mut self, properties: impl IntoIterator<Item = Property>) -> Self {
        for property in properties {
            self.properties.add_or_replace_property(property);
        }
        self
    }

    /// Build the trigger request
    ///
    /// No validation happens here; the server decides whether the build type
    /// exists. An empty property bag is left out of the request entirely.
    pub fn build(self) -> TriggerBuildRequest {
        let properties = (!self.properties.is_empty()).then_some(self.properties);

        TriggerBuildRequest {
            build_type_id: self.build_type_id,
            branch_name: self.branch_name,
            properties,
        }
    }
}
