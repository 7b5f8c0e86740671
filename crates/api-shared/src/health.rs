use crate::dto::HealthRes;

/// Simple health service shared by the REST binaries.
///
/// This service provides a standardised way to check the health status of PETS.
#[derive(Clone, Debug, Default)]
pub struct HealthService;

impl HealthService {
    pub fn new() -> Self {
        Self
    }

    /// Checks health without creating an instance.
    ///
    /// # Returns
    /// A `HealthRes` indicating the service is healthy.
    pub fn check_health() -> HealthRes {
        HealthRes {
            ok: true,
            message: "PETS is alive".into(),
        }
    }
}
