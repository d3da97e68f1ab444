//! Newtype wrappers for the open-ended tag strings of the canonical model.
//!
//! Cloud Foundry documents a closed set of values for process types, probe
//! types, route protocols and lifecycles, but manifests in the wild carry
//! anything. These newtypes keep the value verbatim while still giving each
//! tag its own type. All of them serialize/deserialize as plain strings.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Deref;

macro_rules! string_newtype {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Create a new instance from a string.
            pub fn new(s: impl Into<String>) -> Self {
                Self(s.into())
            }

            /// Return the inner string as a slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consume self and return the inner `String`.
            pub fn into_inner(self) -> String {
                self.0
            }

            pub fn is_empty(&self) -> bool {
                self.0.is_empty()
            }
        }

        impl Deref for $name {
            type Target = str;
            fn deref(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl PartialEq<str> for $name {
            fn eq(&self, other: &str) -> bool {
                self.0 == other
            }
        }

        impl PartialEq<&str> for $name {
            fn eq(&self, other: &&str) -> bool {
                self.0 == *other
            }
        }

        impl PartialEq<String> for $name {
            fn eq(&self, other: &String) -> bool {
                self.0 == *other
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_owned())
            }
        }
    };
}

string_newtype!(
    /// Process type tag such as `web` or `worker`.
    ProcessType
);

string_newtype!(
    /// Health check type: `port`, `http`, `process` or `tcp`.
    ProbeType
);

string_newtype!(
    /// Route protocol: `http`, `http2` or `tcp`.
    RouteProtocol
);

string_newtype!(
    /// Application lifecycle: `buildpack`, `docker` or `cnb`.
    LifecycleType
);

impl ProcessType {
    pub fn web() -> Self {
        Self::new("web")
    }

    pub fn worker() -> Self {
        Self::new("worker")
    }

    pub fn is_known(&self) -> bool {
        matches!(self.as_str(), "web" | "worker")
    }
}

impl ProbeType {
    pub fn port() -> Self {
        Self::new("port")
    }

    pub fn http() -> Self {
        Self::new("http")
    }

    pub fn process() -> Self {
        Self::new("process")
    }

    pub fn tcp() -> Self {
        Self::new("tcp")
    }

    pub fn is_known(&self) -> bool {
        matches!(self.as_str(), "port" | "http" | "process" | "tcp")
    }
}

impl RouteProtocol {
    pub fn http() -> Self {
        Self::new("http")
    }

    pub fn http2() -> Self {
        Self::new("http2")
    }

    pub fn tcp() -> Self {
        Self::new("tcp")
    }

    pub fn is_known(&self) -> bool {
        matches!(self.as_str(), "http" | "http2" | "tcp")
    }
}

impl LifecycleType {
    pub fn is_known(&self) -> bool {
        matches!(self.as_str(), "buildpack" | "docker" | "cnb")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn probe_type_display_and_as_ref() {
        let t = ProbeType::http();
        assert_eq!(t.to_string(), "http");
        assert_eq!(t.as_str(), "http");
        assert_eq!(AsRef::<str>::as_ref(&t), "http");
    }

    #[test]
    fn process_type_serializes_as_plain_string() {
        let t = ProcessType::worker();
        let json = serde_json::to_string(&t).unwrap();
        assert_eq!(json, "\"worker\"");
        let back: ProcessType = serde_json::from_str(&json).unwrap();
        assert_eq!(back, t);
    }

    #[test]
    fn unknown_tags_are_kept_verbatim() {
        let t = ProcessType::from("scheduler");
        assert_eq!(t, "scheduler");
        assert!(!t.is_known());

        let p = ProbeType::from("none");
        assert_eq!(p.into_inner(), "none");
    }

    #[test]
    fn known_tags_are_recognized() {
        assert!(ProcessType::web().is_known());
        assert!(ProbeType::tcp().is_known());
        assert!(RouteProtocol::http2().is_known());
        assert!(LifecycleType::new("cnb").is_known());
        assert!(!RouteProtocol::new("udp").is_known());
    }

    #[test]
    fn default_is_empty() {
        assert!(ProcessType::default().is_empty());
        assert!(!ProcessType::web().is_empty());
    }
}
