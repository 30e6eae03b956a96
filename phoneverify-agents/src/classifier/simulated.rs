use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use extractors::NormalizedRequest;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use shared_types::{find_country, LineType};

use super::{ClassificationResult, Classifier};
use crate::error::ClassifierError;

fn carriers_for(iso: &str) -> &'static [&'static str] {
    match iso {
        "US" => &["Verizon", "AT&T", "T-Mobile"],
        "GB" => &["Vodafone", "EE", "O2", "Three"],
        "IN" => &["Jio", "Airtel", "Vi", "BSNL"],
        "MX" => &["Telcel", "AT&T Mexico", "Movistar"],
        "BR" => &["Vivo", "Claro", "TIM", "Oi"],
        "DE" => &["Telekom", "Vodafone", "O2"],
        "FR" => &["Orange", "SFR", "Bouygues Telecom", "Free Mobile"],
        "JP" => &["NTT Docomo", "au", "SoftBank"],
        "CN" => &["China Mobile", "China Unicom", "China Telecom"],
        "AU" => &["Telstra", "Optus", "Vodafone AU"],
        _ => &["Unknown Carrier"],
    }
}

/// Seedable stand-in for a real classification service.
///
/// Picks a carrier from a per-country table and a line type with weights
/// 70/20/10 (mobile/landline/voip). Fails with probability `failure_rate`.
pub struct SimulatedClassifier {
    rng: Mutex<StdRng>,
    failure_rate: f64,
}

impl SimulatedClassifier {
    pub fn new(seed: Option<u64>, failure_rate: f64) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            rng: Mutex::new(rng),
            // NaN survives clamp and would panic in gen_bool
            failure_rate: if failure_rate.is_nan() {
                0.0
            } else {
                failure_rate.clamp(0.0, 1.0)
            },
        }
    }
}

#[async_trait]
impl Classifier for SimulatedClassifier {
    async fn classify(&self, request: &NormalizedRequest) -> Result<ClassificationResult, ClassifierError> {
        let mut rng = self.rng.lock().unwrap_or_else(|e| e.into_inner());

        if rng.gen_bool(self.failure_rate) {
            return Err(ClassifierError::Simulated(
                "classification service timed out".to_string(),
            ));
        }

        let country = find_country(&request.country_code);
        let carriers = carriers_for(country.as_ref().map(|c| c.iso.as_str()).unwrap_or(""));
        let carrier = carriers[rng.gen_range(0..carriers.len())];

        let line_type = match rng.gen_range(0..100) {
            0..=69 => LineType::Mobile,
            70..=89 => LineType::Landline,
            _ => LineType::Voip,
        };

        let digits = request.phone_number.len();
        let format_valid = (7..=12).contains(&digits);

        Ok(ClassificationResult {
            is_valid: format_valid,
            country_name: country
                .map(|c| c.name)
                .unwrap_or_else(|| "Unknown".to_string()),
            carrier: carrier.to_string(),
            line_type,
            format_valid,
            confidence: rng.gen_range(75..=98),
        })
    }
}

/// Returns the same answer on every call and counts calls
pub struct StaticClassifier {
    result: Result<ClassificationResult, String>,
    calls: AtomicUsize,
}

impl StaticClassifier {
    pub fn returning(result: ClassificationResult) -> Self {
        Self {
            result: Ok(result),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing(reason: impl Into<String>) -> Self {
        Self {
            result: Err(reason.into()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Classifier for StaticClassifier {
    async fn classify(&self, _request: &NormalizedRequest) -> Result<ClassificationResult, ClassifierError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.result.clone().map_err(ClassifierError::Simulated)
    }
}
