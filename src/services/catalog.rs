// SPDX-License-Identifier: MIT

//! Seed data for the GRACE module catalog.

use crate::db::Db;
use crate::error::AppError;
use crate::models::ModuleType;

struct ModuleSeed {
    order_index: i64,
    title: &'static str,
    slug: &'static str,
    description: &'static str,
    estimated_duration_minutes: i64,
    module_type: ModuleType,
}

const MODULE_SEEDS: &[ModuleSeed] = &[
    ModuleSeed {
        order_index: 1,
        title: "Importancia Clínica",
        slug: "importancia-clinica",
        description:
            "Descubre por qué la limpieza mucosa es fundamental en endoscopía diagnóstica",
        estimated_duration_minutes: 15,
        module_type: ModuleType::Educational,
    },
    ModuleSeed {
        order_index: 2,
        title: "Fundamentos de GRACE",
        slug: "fundamentos-grace",
        description:
            "Aprende la escala GRACE en detalle: historia, validación y definiciones exactas",
        estimated_duration_minutes: 20,
        module_type: ModuleType::Educational,
    },
    ModuleSeed {
        order_index: 3,
        title: "Entrenamiento Práctico",
        slug: "entrenamiento-practico",
        description: "Practica con casos reales y recibe feedback inmediato",
        estimated_duration_minutes: 25,
        module_type: ModuleType::Educational,
    },
    ModuleSeed {
        order_index: 4,
        title: "Aplicación Clínica",
        slug: "aplicacion-clinica",
        description: "Aprende a aplicar GRACE en tu práctica diaria",
        estimated_duration_minutes: 15,
        module_type: ModuleType::Educational,
    },
    ModuleSeed {
        order_index: 5,
        title: "Evaluación Round 1",
        slug: "evaluacion-round-1",
        description: "Primera evaluación estandarizada de 38 casos clínicos",
        estimated_duration_minutes: 30,
        module_type: ModuleType::Evaluation,
    },
    ModuleSeed {
        order_index: 6,
        title: "Re-evaluación Round 2",
        slug: "evaluacion-round-2",
        description: "Segunda evaluación para medir concordancia intra-observador",
        estimated_duration_minutes: 30,
        module_type: ModuleType::Evaluation,
    },
];

/// Upsert the module catalog (idempotent, keyed by slug).
pub async fn seed_modules(db: &Db) -> Result<(), AppError> {
    for seed in MODULE_SEEDS {
        db.upsert_module(
            seed.order_index,
            seed.title,
            seed.slug,
            seed.description,
            seed.estimated_duration_minutes,
            seed.module_type,
            true,
        )
        .await?;
    }
    tracing::info!(count = MODULE_SEEDS.len(), "Module catalog seeded");
    Ok(())
}
