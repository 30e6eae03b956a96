use shared_types::WhatsappStatus;

pub const VALIDITY_WEIGHT: f64 = 0.4;
pub const PRESENCE_WEIGHT: f64 = 0.4;
pub const QUALITY_WEIGHT: f64 = 0.2;
pub const RETRY_PENALTY: f64 = 0.05;

/// Quality factor applied once any retry happened
const DEGRADED_QUALITY: f64 = 0.7;

/// Inputs of `S = 0.4V + 0.4W + 0.2Q - 0.05R`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConfidenceComponents {
    /// 1 when the number is valid
    pub validity: f64,
    /// 1 verified, 0.5 unchecked, 0 not found
    pub presence: f64,
    /// 1 on a clean run, 0.7 after a retry
    pub quality: f64,
    pub retries: u32,
}

impl ConfidenceComponents {
    pub fn new(is_valid: bool, whatsapp_status: WhatsappStatus, retry_count: u32) -> Self {
        Self {
            validity: if is_valid { 1.0 } else { 0.0 },
            presence: match whatsapp_status {
                WhatsappStatus::Verified => 1.0,
                WhatsappStatus::Unchecked => 0.5,
                WhatsappStatus::NotFound => 0.0,
            },
            quality: if retry_count > 0 { DEGRADED_QUALITY } else { 1.0 },
            retries: retry_count,
        }
    }

    pub fn raw(&self) -> f64 {
        self.validity * VALIDITY_WEIGHT + self.presence * PRESENCE_WEIGHT + self.quality * QUALITY_WEIGHT
            - f64::from(self.retries) * RETRY_PENALTY
    }

    /// Clamped to [0, 1] before scaling to 0-100
    pub fn score(&self) -> u8 {
        (self.raw().clamp(0.0, 1.0) * 100.0).round() as u8
    }

    pub fn describe(&self) -> String {
        format!(
            "V={}, W={:.1}, Q={:.1}, R={}",
            self.validity, self.presence, self.quality, self.retries
        )
    }
}
