pub struct DefaultsConfig {
    pub window_size: usize,
    pub score_code: String,
    pub prediction_type: String,
    pub predictor: String,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            window_size: 15,
            score_code: "0".to_string(),
            prediction_type: "netMHCIIpan".to_string(),
            predictor: "netMHCIIpan".to_string(),
        }
    }
}
