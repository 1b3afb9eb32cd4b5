macro_rules! v1_path {
    ($path:literal) => {
        concat!("/api/v1", $path)
    };
}

/// Versioned API route definitions shared across Scenex services
pub mod v1 {
    pub const ROOT: &str = "/api/v1";
    pub const VERSION: &str = "v1";

    pub mod scenarios {
        /// POST target for scenario build submissions.
        pub const BUILD: &str = v1_path!("/models/scenario");
        /// GET target for record-shaped scenario listings.
        pub const LIST: &str = v1_path!("/models/scenario");
    }

    pub mod events {
        /// Persistent push channel for scenario lifecycle events.
        pub const SCENARIOS: &str = v1_path!("/events/scenarios");
    }
}

#[cfg(test)]
mod tests {
    use super::v1;

    #[test]
    fn routes_are_versioned() {
        assert!(v1::scenarios::BUILD.starts_with(v1::ROOT));
        assert!(v1::events::SCENARIOS.starts_with(v1::ROOT));
    }
}
