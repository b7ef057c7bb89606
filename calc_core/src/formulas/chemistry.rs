//! # Chemistry Formulas
//!
//! Molarity, dilution (C1·V1 = C2·V2) and the ideal gas law. The two
//! equation solvers follow the Ohm's-law pattern: pass every known value,
//! leave exactly one `None`, get the full set back.

use serde::{Deserialize, Serialize};

use crate::errors::{CalcError, CalcResult};
use crate::formulas::registry::Formula;
use crate::numeric::{ensure_positive, fmt_num};

/// Molar gas constant R in J/(mol·K)
pub const GAS_CONSTANT: f64 = 8.314_462_618;

/// Molarity result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MolarityResult {
    pub moles: f64,
    /// mol/L
    pub molarity: f64,
    /// Same concentration in mmol/L
    pub millimolar: f64,
    pub steps: Vec<String>,
}

/// `n = m / M`, `c = n / V`
pub fn molarity(solute_grams: f64, molar_mass: f64, volume_liters: f64) -> CalcResult<MolarityResult> {
    ensure_positive("solute_grams", solute_grams)?;
    ensure_positive("molar_mass", molar_mass)?;
    ensure_positive("volume_liters", volume_liters)?;

    let moles = solute_grams / molar_mass;
    let c = moles / volume_liters;
    Ok(MolarityResult {
        moles,
        molarity: c,
        millimolar: c * 1000.0,
        steps: vec![
            Formula::Molarity.metadata().formula_plain.to_string(),
            format!("n = {} g / {} g/mol = {} mol", fmt_num(solute_grams, 6), fmt_num(molar_mass, 6), fmt_num(moles, 6)),
            format!("c = {} mol / {} L = {} mol/L", fmt_num(moles, 6), fmt_num(volume_liters, 6), fmt_num(c, 6)),
        ],
    })
}

/// Count the `None`s and return the index of the only one.
fn single_unknown(values: &[Option<f64>], calculation: &str) -> CalcResult<usize> {
    let unknown: Vec<usize> = values
        .iter()
        .enumerate()
        .filter(|(_, v)| v.is_none())
        .map(|(i, _)| i)
        .collect();
    match unknown.as_slice() {
        [only] => Ok(*only),
        _ => Err(CalcError::invalid_input(
            calculation,
            format!("{} unknowns", unknown.len()),
            "Exactly one value must be left empty",
        )),
    }
}

/// Dilution result: all four quantities filled in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DilutionResult {
    pub c1: f64,
    pub v1: f64,
    pub c2: f64,
    pub v2: f64,
    /// Solvent to add, `v2 - v1`
    pub solvent_to_add: f64,
    pub steps: Vec<String>,
}

/// Solve `C1·V1 = C2·V2` for the one missing value.
pub fn dilution(c1: Option<f64>, v1: Option<f64>, c2: Option<f64>, v2: Option<f64>) -> CalcResult<DilutionResult> {
    let values = [c1, v1, c2, v2];
    let missing = single_unknown(&values, "dilution")?;
    let names = ["c1", "v1", "c2", "v2"];
    for (i, v) in values.iter().enumerate() {
        if let Some(v) = v {
            ensure_positive(names[i], *v)?;
        }
    }

    let get = |i: usize| values[i].unwrap_or_default();
    let (c1, v1, c2, v2) = match missing {
        0 => (get(2) * get(3) / get(1), get(1), get(2), get(3)),
        1 => (get(0), get(2) * get(3) / get(0), get(2), get(3)),
        2 => (get(0), get(1), get(0) * get(1) / get(3), get(3)),
        _ => (get(0), get(1), get(2), get(0) * get(1) / get(2)),
    };

    if c2 > c1 {
        return Err(CalcError::domain(
            "dilution",
            format!("final concentration {} exceeds initial {}", fmt_num(c2, 6), fmt_num(c1, 6)),
        ));
    }

    Ok(DilutionResult {
        c1,
        v1,
        c2,
        v2,
        solvent_to_add: v2 - v1,
        steps: vec![
            Formula::Dilution.metadata().formula_plain.to_string(),
            format!("{} = {}", names[missing], fmt_num([c1, v1, c2, v2][missing], 6)),
        ],
    })
}

/// Ideal gas state, SI units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IdealGasResult {
    pub pressure_pa: f64,
    pub volume_m3: f64,
    pub moles: f64,
    pub temperature_k: f64,
    pub pressure_atm: f64,
    pub volume_l: f64,
    pub steps: Vec<String>,
}

/// Solve `P·V = n·R·T` for the single missing value (SI units).
pub fn ideal_gas(
    pressure_pa: Option<f64>,
    volume_m3: Option<f64>,
    moles: Option<f64>,
    temperature_k: Option<f64>,
) -> CalcResult<IdealGasResult> {
    let values = [pressure_pa, volume_m3, moles, temperature_k];
    let missing = single_unknown(&values, "ideal_gas")?;
    let names = ["pressure_pa", "volume_m3", "moles", "temperature_k"];
    for (i, v) in values.iter().enumerate() {
        if let Some(v) = v {
            ensure_positive(names[i], *v)?;
        }
    }

    let get = |i: usize| values[i].unwrap_or_default();
    let r = GAS_CONSTANT;
    let (p, v, n, t) = match missing {
        0 => (get(2) * r * get(3) / get(1), get(1), get(2), get(3)),
        1 => (get(0), get(2) * r * get(3) / get(0), get(2), get(3)),
        2 => (get(0), get(1), get(0) * get(1) / (r * get(3)), get(3)),
        _ => (get(0), get(1), get(2), get(0) * get(1) / (get(2) * r)),
    };

    Ok(IdealGasResult {
        pressure_pa: p,
        volume_m3: v,
        moles: n,
        temperature_k: t,
        pressure_atm: p / 101_325.0,
        volume_l: v * 1000.0,
        steps: vec![
            Formula::IdealGasLaw.metadata().formula_plain.to_string(),
            format!("R = {} J/(mol K)", GAS_CONSTANT),
            format!("{} = {}", names[missing], fmt_num([p, v, n, t][missing], 9)),
        ],
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_molarity_nacl() {
        // 58.44 g NaCl in 1 L -> 1 mol/L
        let r = molarity(58.44, 58.44, 1.0).unwrap();
        assert_relative_eq!(r.molarity, 1.0, max_relative = 1e-12);
        assert_relative_eq!(r.millimolar, 1000.0, max_relative = 1e-12);
    }

    #[test]
    fn test_dilution_solves_each_slot() {
        let r = dilution(Some(2.0), Some(0.5), Some(0.5), None).unwrap();
        assert_relative_eq!(r.v2, 2.0, max_relative = 1e-12);
        assert_relative_eq!(r.solvent_to_add, 1.5, max_relative = 1e-12);

        let r = dilution(None, Some(1.0), Some(1.0), Some(4.0)).unwrap();
        assert_relative_eq!(r.c1, 4.0, max_relative = 1e-12);
    }

    #[test]
    fn test_dilution_rejects_concentrating() {
        assert!(dilution(Some(1.0), Some(1.0), Some(2.0), None).is_err());
        assert!(dilution(Some(1.0), None, None, Some(1.0)).is_err());
    }

    #[test]
    fn test_ideal_gas_one_mole_stp() {
        let r = ideal_gas(Some(101_325.0), None, Some(1.0), Some(273.15)).unwrap();
        assert_relative_eq!(r.volume_l, 22.414, max_relative = 1e-3);

        let back = ideal_gas(Some(101_325.0), Some(r.volume_m3), Some(1.0), None).unwrap();
        assert_relative_eq!(back.temperature_k, 273.15, max_relative = 1e-9);
    }
}
