use crate::error::NotifierError;
use crate::session::{FlowUnit, Route};
use std::collections::BTreeMap;

#[cfg(test)]
use mockall::automock;

/// Trait for posting a serialized notification
#[cfg_attr(test, automock)]
pub trait NotificationSender: Send + Sync {
    /// POST `body` as JSON to `url` and return the response status code.
    ///
    /// Only transport faults are errors; any status, including 4xx and 5xx,
    /// is returned as `Ok`.
    fn post_json(&self, url: &str, body: &str) -> Result<u16, NotifierError>;
}

/// Trait for evaluating attribute references in a configured value
pub trait AttributeExpander: Send + Sync {
    /// Substitute attribute references in `template` using `attributes`
    fn expand(&self, template: &str, attributes: &BTreeMap<String, String>) -> String;
}

impl<F> AttributeExpander for F
where
    F: Fn(&str, &BTreeMap<String, String>) -> String + Send + Sync,
{
    fn expand(&self, template: &str, attributes: &BTreeMap<String, String>) -> String {
        self(template, attributes)
    }
}

/// Trait for the host's unit of work
#[cfg_attr(test, automock)]
pub trait Session {
    /// Take the next pending unit, if any
    fn get(&mut self) -> Option<FlowUnit>;

    /// Mark a unit so the host delays its next delivery
    fn penalize(&mut self, unit: FlowUnit) -> FlowUnit;

    /// Hand a unit to one of the output routes
    fn transfer(&mut self, unit: FlowUnit, route: Route);

    /// Record a provenance send event for `unit` towards `destination`
    fn report_send(&mut self, unit: &FlowUnit, destination: &str);

    /// Ask the host to back off scheduling this processor
    fn yield_processor(&mut self);
}
