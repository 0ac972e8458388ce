use entity::Stage;

use crate::error::{CrmError, CrmResult};

/// Stage identifiers in pipeline order.
pub fn stage_keys() -> Vec<&'static str> {
    Stage::ALL.iter().map(|stage| stage.as_str()).collect()
}

/// Exact, case-sensitive lookup of a stage identifier. No trimming.
pub fn validate_stage(candidate: &str) -> CrmResult<Stage> {
    Stage::ALL
        .into_iter()
        .find(|stage| stage.as_str() == candidate)
        .ok_or_else(|| CrmError::InvalidStage {
            candidate: candidate.to_string(),
            valid: stage_keys(),
        })
}

/// Win probability suggested for a stage; used by the demo seed.
pub fn suggested_probability(stage: Stage) -> i32 {
    match stage {
        Stage::Prospeccao => 10,
        Stage::Oportunidade => 20,
        Stage::Identificacao => 30,
        Stage::Viabilidade => 40,
        Stage::Precificacao => 60,
        Stage::Proposta => 75,
        Stage::Contrato => 95,
    }
}
