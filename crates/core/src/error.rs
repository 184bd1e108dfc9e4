#[derive(Debug, thiserror::Error)]
pub enum ProjectionError {
    #[error("filename {filename:?} is shorter than the {min_len}-character strip window")]
    FilenameTooShort { filename: String, min_len: usize },

    #[error("filename {filename:?} strips to an empty name")]
    EmptyName { filename: String },

    #[error("duration {seconds}s is negative or not finite")]
    InvalidDuration { seconds: f64 },

    #[error("no weight tier covers content aged {age_days} days")]
    NoWeightTier { age_days: i64 },
}
