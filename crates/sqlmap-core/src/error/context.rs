/// Describes what a request was doing, so failures can say where they happened.
///
/// The engine narrates each step into the request's context; the dispatcher
/// attaches a snapshot to any error that escapes the request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErrorContext {
    /// The resource (usually a mapping file) the failing element came from.
    pub resource: Option<String>,

    /// What the engine was doing, e.g. `applying a result map`.
    pub activity: Option<String>,

    /// The id of the statement or result map involved.
    pub object_id: Option<String>,

    /// Free-form hint, e.g. the error string of the mapping being applied.
    pub more_info: Option<String>,
}

impl ErrorContext {
    pub fn set_resource(&mut self, resource: Option<&str>) {
        self.resource = resource.map(str::to_string);
    }

    pub fn set_activity(&mut self, activity: impl Into<String>) {
        self.activity = Some(activity.into());
    }

    pub fn set_object_id(&mut self, object_id: impl Into<String>) {
        self.object_id = Some(object_id.into());
    }

    pub fn set_more_info(&mut self, more_info: impl Into<String>) {
        self.more_info = Some(more_info.into());
    }

    pub fn is_empty(&self) -> bool {
        self.resource.is_none()
            && self.activity.is_none()
            && self.object_id.is_none()
            && self.more_info.is_none()
    }

    pub fn reset(&mut self) {
        *self = ErrorContext::default();
    }
}

impl core::fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        let mut sep = "";

        if let Some(resource) = &self.resource {
            write!(f, "the error occurred in {resource}.")?;
            sep = " ";
        }
        if let Some(activity) = &self.activity {
            write!(f, "{sep}the error occurred while {activity}.")?;
            sep = " ";
        }
        if let Some(object_id) = &self.object_id {
            write!(f, "{sep}check the {object_id}.")?;
            sep = " ";
        }
        if let Some(more_info) = &self.more_info {
            write!(f, "{sep}{more_info}")?;
        }

        Ok(())
    }
}
