//! Deterministic employee and office names for demo rosters.
//!
//! All generation is deterministic (same RNG seed = same names).

use crate::rng::RosterRng;

/// Deterministic name generator using curated name lists
pub struct NameGenerator;

impl NameGenerator {
    /// First name plus two surnames, e.g. "Camila Rojas Fuentes".
    pub fn generate_full_name(rng: &mut RosterRng) -> String {
        let first_name = Self::generate_first_name(rng);
        let paternal = Self::generate_last_name(rng);
        let maternal = Self::generate_last_name(rng);
        format!("{first_name} {paternal} {maternal}")
    }

    pub fn generate_first_name(rng: &mut RosterRng) -> &'static str {
        *rng.pick(Self::first_names())
    }

    pub fn generate_last_name(rng: &mut RosterRng) -> &'static str {
        *rng.pick(Self::last_names())
    }

    /// "Of. Com. <district>" for branches, "Unidad Móvil <n>" for mobile units.
    pub fn generate_office_name(rng: &mut RosterRng, mobile_unit_index: Option<u32>) -> String {
        match mobile_unit_index {
            Some(n) => format!("Unidad Móvil {n}"),
            None => format!("Of. Com. {}", rng.pick(Self::districts())),
        }
    }

    fn first_names() -> &'static [&'static str] {
        &[
            "Camila", "Valentina", "Francisca", "Javiera", "Catalina", "Constanza",
            "Fernanda", "Daniela", "Antonia", "Isidora", "Martina", "Josefa",
            "Carolina", "Paula", "Andrea", "Macarena", "Belén", "Ignacia",
            "Sofía", "Florencia", "Matías", "Sebastián", "Benjamín", "Vicente",
            "Joaquín", "Tomás", "Nicolás", "Diego", "Felipe", "Cristóbal",
            "Ignacio", "Gonzalo", "Rodrigo", "Francisco", "Pablo", "Martín",
            "Lucas", "Agustín", "Maximiliano", "Juan", "Carlos", "Luis",
        ]
    }

    fn last_names() -> &'static [&'static str] {
        &[
            "González", "Muñoz", "Rojas", "Díaz", "Pérez", "Soto", "Contreras",
            "Silva", "Martínez", "Sepúlveda", "Morales", "Rodríguez", "López",
            "Fuentes", "Hernández", "Torres", "Araya", "Flores", "Espinoza",
            "Valenzuela", "Castillo", "Tapia", "Reyes", "Gutiérrez", "Castro",
            "Pizarro", "Álvarez", "Vásquez", "Sánchez", "Fernández", "Ramírez",
            "Carrasco", "Gómez", "Cortés", "Herrera", "Núñez", "Jara", "Vergara",
            "Rivera", "Figueroa", "Riquelme", "García", "Miranda", "Bravo",
        ]
    }

    fn districts() -> &'static [&'static str] {
        &[
            "Santiago Centro", "Providencia", "Las Condes", "Ñuñoa", "Maipú",
            "La Florida", "Puente Alto", "San Bernardo", "Quilicura", "Recoleta",
            "Estación Central", "La Reina", "Peñalolén", "Independencia",
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::{DemoStream, RosterRng};

    #[test]
    fn name_generation_is_deterministic() {
        let mut rng1 = RosterRng::for_stream(12345, DemoStream::Names);
        let name1 = NameGenerator::generate_full_name(&mut rng1);

        let mut rng2 = RosterRng::for_stream(12345, DemoStream::Names);
        let name2 = NameGenerator::generate_full_name(&mut rng2);

        assert_eq!(name1, name2, "Same seed should produce same name");
    }

    #[test]
    fn generates_valid_full_names() {
        let mut rng = RosterRng::for_stream(12345, DemoStream::Names);

        for _ in 0..100 {
            let name = NameGenerator::generate_full_name(&mut rng);

            // First name and two surnames
            let parts: Vec<&str> = name.split_whitespace().collect();
            assert_eq!(parts.len(), 3, "Name should have exactly 3 parts: {}", name);
            assert!(parts.iter().all(|p| !p.is_empty()));
        }
    }

    #[test]
    fn single_names_come_from_the_curated_lists() {
        let mut rng = RosterRng::for_stream(99, DemoStream::Names);

        for _ in 0..50 {
            let first = NameGenerator::generate_first_name(&mut rng);
            let last = NameGenerator::generate_last_name(&mut rng);
            assert!(NameGenerator::first_names().contains(&first), "unknown first name: {first}");
            assert!(NameGenerator::last_names().contains(&last), "unknown last name: {last}");
        }
    }

    #[test]
    fn mobile_units_are_named_by_index() {
        let mut rng = RosterRng::for_stream(7, DemoStream::Offices);

        assert_eq!(
            NameGenerator::generate_office_name(&mut rng, Some(2)),
            "Unidad Móvil 2"
        );
        let branch = NameGenerator::generate_office_name(&mut rng, None);
        assert!(branch.starts_with("Of. Com. "), "unexpected branch name: {branch}");
    }
}
