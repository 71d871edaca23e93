use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RegenerateDecResponse {
    pub dec: Option<String>,
    #[serde(rename = "deviceEnrollmentCode")]
    pub device_enrollment_code: Option<String>,
    pub code: Option<String>,
}

impl RegenerateDecResponse {
    pub fn into_code(self) -> Option<String> {
        [self.dec, self.device_enrollment_code, self.code]
            .into_iter()
            .flatten()
            .find(|code| !code.trim().is_empty())
    }
}
