//! The fixed NACE competency taxonomy.

use std::fmt;

use serde::{Deserialize, Serialize};

/// One of the eight NACE career-readiness competencies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Competency {
    Communication,
    CriticalThinking,
    Leadership,
    Teamwork,
    Technology,
    Professionalism,
    CareerSelfDevelopment,
    EquityInclusion,
}

impl Competency {
    /// The complete taxonomy, in display order.
    pub const ALL: [Competency; 8] = [
        Competency::Communication,
        Competency::CriticalThinking,
        Competency::Leadership,
        Competency::Teamwork,
        Competency::Technology,
        Competency::Professionalism,
        Competency::CareerSelfDevelopment,
        Competency::EquityInclusion,
    ];

    /// The label stored in `job_nace_mappings.competency_N`.
    pub const fn name(self) -> &'static str {
        match self {
            Competency::Communication => "Communication",
            Competency::CriticalThinking => "Critical Thinking",
            Competency::Leadership => "Leadership",
            Competency::Teamwork => "Teamwork",
            Competency::Technology => "Technology",
            Competency::Professionalism => "Professionalism",
            Competency::CareerSelfDevelopment => "Career & Self-Development",
            Competency::EquityInclusion => "Equity & Inclusion",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.name() == name)
    }
}

impl fmt::Display for Competency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Names of all competencies in display order.
pub fn competency_names() -> Vec<&'static str> {
    Competency::ALL.iter().map(|c| c.name()).collect()
}
