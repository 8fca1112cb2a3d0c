use crate::env::EnvironmentSnapshot;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QualityTier {
    /// User asked for reduced motion: one static frame
    Reduced,
    /// Two logical cores or fewer
    Low,
    Standard,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BudgetProfile {
    pub count_scale: f32,
    pub connections: bool,
    pub pointer: bool,
    pub max_frame_rate: u32,
    pub animate: bool,
}

impl QualityTier {
    pub fn detect(env: &EnvironmentSnapshot) -> Self {
        if env.reduced_motion {
            Self::Reduced
        } else if matches!(env.hardware_concurrency, Some(cores) if cores <= 2) {
            Self::Low
        } else {
            Self::Standard
        }
    }

    pub fn budget(self) -> BudgetProfile {
        match self {
            Self::Reduced => BudgetProfile {
                count_scale: 0.6,
                connections: false,
                pointer: false,
                max_frame_rate: 0,
                animate: false,
            },
            Self::Low => BudgetProfile {
                count_scale: 0.6,
                connections: false,
                pointer: false,
                max_frame_rate: 30,
                animate: true,
            },
            Self::Standard => BudgetProfile {
                count_scale: 1.0,
                connections: true,
                pointer: true,
                max_frame_rate: 240,
                animate: true,
            },
        }
    }
}
