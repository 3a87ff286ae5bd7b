use std::collections::BTreeMap;

use crate::error::MolpropError;

/// Where a property value lives inside a PubChem compound record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropertySource {
    /// Entry of the record's `props` array, matched on URN label and (any of) URN names.
    /// An empty `names` slice accepts any name under the label.
    Prop {
        label: &'static str,
        names: &'static [&'static str],
    },
    /// Field of the record's `count` object.
    Count(&'static str),
    /// The record's top-level formal charge.
    Charge,
    /// Type of the first coordinate set.
    CoordinateType,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PropertyDef {
    pub name: &'static str,
    pub source: PropertySource,
    /// Only present in the 3D conformer record.
    pub conformer: bool,
}

const fn prop(
    name: &'static str,
    label: &'static str,
    names: &'static [&'static str],
) -> PropertyDef {
    PropertyDef {
        name,
        source: PropertySource::Prop { label, names },
        conformer: false,
    }
}

const fn prop_3d(
    name: &'static str,
    label: &'static str,
    names: &'static [&'static str],
) -> PropertyDef {
    PropertyDef {
        name,
        source: PropertySource::Prop { label, names },
        conformer: true,
    }
}

const fn count(name: &'static str, field: &'static str) -> PropertyDef {
    PropertyDef {
        name,
        source: PropertySource::Count(field),
        conformer: false,
    }
}

static PROPERTIES: [PropertyDef; 36] = [
    count("atom_stereo_count", "atom_chiral"),
    count("bond_stereo_count", "bond_chiral"),
    prop("canonical_smiles", "SMILES", &["Canonical", "Connectivity"]),
    PropertyDef {
        name: "charge",
        source: PropertySource::Charge,
        conformer: false,
    },
    prop("complexity", "Compound Complexity", &[]),
    prop_3d("conformer_id_3d", "Conformer", &["ID"]),
    prop_3d("conformer_rmsd_3d", "Conformer", &["RMSD"]),
    PropertyDef {
        name: "coordinate_type",
        source: PropertySource::CoordinateType,
        conformer: false,
    },
    count("covalent_unit_count", "covalent_unit"),
    count("defined_atom_stereo_count", "atom_chiral_def"),
    count("defined_bond_stereo_count", "bond_chiral_def"),
    prop_3d("effective_rotor_count_3d", "Count", &["Effective Rotor"]),
    prop("exact_mass", "Mass", &["Exact"]),
    prop("h_bond_acceptor_count", "Count", &["Hydrogen Bond Acceptor"]),
    prop("h_bond_donor_count", "Count", &["Hydrogen Bond Donor"]),
    count("heavy_atom_count", "heavy_atom"),
    prop("inchi", "InChI", &[]),
    prop("inchikey", "InChIKey", &[]),
    prop("isomeric_smiles", "SMILES", &["Isomeric", "Absolute"]),
    count("isotope_atom_count", "isotope_atom"),
    prop("iupac_name", "IUPAC Name", &["Preferred"]),
    prop_3d("mmff94_energy_3d", "Energy", &["MMFF94 NoEstat"]),
    prop_3d("mmff94_partial_charges_3d", "Charge", &["MMFF94"]),
    prop("molecular_formula", "Molecular Formula", &[]),
    prop("molecular_weight", "Molecular Weight", &[]),
    prop("monoisotopic_mass", "Weight", &["MonoIsotopic"]),
    prop_3d("multipoles_3d", "Shape", &["Multipoles"]),
    prop_3d("pharmacophore_features_3d", "Features", &["Pharmacophore"]),
    prop("rotatable_bond_count", "Count", &["Rotatable Bond"]),
    prop_3d("shape_fingerprint_3d", "Fingerprint", &["Shape"]),
    prop_3d("shape_selfoverlap_3d", "Shape", &["Self Overlap"]),
    prop("tpsa", "Topological", &["Polar Surface Area"]),
    count("undefined_atom_stereo_count", "atom_chiral_undef"),
    count("undefined_bond_stereo_count", "bond_chiral_undef"),
    prop_3d("volume_3d", "Shape", &["Volume"]),
    prop("xlogp", "Log P", &[]),
];

pub struct PropertyCatalog;

impl PropertyCatalog {
    pub fn len() -> usize {
        PROPERTIES.len()
    }

    /// 1-indexed mapping shown to the user when picking properties.
    pub fn all() -> BTreeMap<usize, &'static str> {
        PROPERTIES
            .iter()
            .enumerate()
            .map(|(idx, def)| (idx + 1, def.name))
            .collect()
    }

    pub fn get(index: usize) -> Option<&'static PropertyDef> {
        index.checked_sub(1).and_then(|idx| PROPERTIES.get(idx))
    }

    pub fn by_name(name: &str) -> Option<&'static PropertyDef> {
        PROPERTIES.iter().find(|def| def.name == name)
    }
}

/// Properties requested for every compound of a run, in the order they are reported.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertySelection(Vec<&'static PropertyDef>);

impl PropertySelection {
    pub fn all() -> Self {
        Self(PROPERTIES.iter().collect())
    }

    /// Parses `a`/`all`, or comma-separated catalog indices and property names.
    pub fn parse(text: &str) -> Result<Self, MolpropError> {
        let trimmed = text.trim();
        if is_all_token(trimmed) {
            return Ok(Self::all());
        }
        Self::from_tokens(trimmed.split(','))
    }

    pub fn from_tokens<'a, I>(tokens: I) -> Result<Self, MolpropError>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut selected: Vec<&'static PropertyDef> = Vec::new();
        for token in tokens {
            let token = token.trim();
            if token.is_empty() {
                continue;
            }
            let def = resolve_token(token)?;
            if !selected.iter().any(|existing| existing.name == def.name) {
                selected.push(def);
            }
        }
        let selection = Self(selected);
        if selection.is_empty() {
            return Err(MolpropError::InvalidPropertySelection(
                "no properties selected".to_string(),
            ));
        }
        Ok(selection)
    }

    pub fn iter(&self) -> impl Iterator<Item = &'static PropertyDef> + '_ {
        self.0.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.0.iter().map(|def| def.name).collect()
    }

    pub fn requires_conformer(&self) -> bool {
        self.0.iter().any(|def| def.conformer)
    }
}

fn is_all_token(token: &str) -> bool {
    token.eq_ignore_ascii_case("a") || token.eq_ignore_ascii_case("all")
}

fn resolve_token(token: &str) -> Result<&'static PropertyDef, MolpropError> {
    if let Ok(index) = token.parse::<usize>() {
        return PropertyCatalog::get(index).ok_or_else(|| {
            MolpropError::InvalidPropertySelection(format!(
                "{index} is outside 1-{}",
                PropertyCatalog::len()
            ))
        });
    }
    PropertyCatalog::by_name(&token.to_lowercase())
        .ok_or_else(|| MolpropError::InvalidPropertySelection(format!("unknown property {token}")))
}
