//! Mesh role classification.
//!
//! Splits a scene's meshes into the weight source (the most completely
//! rigged mesh), targets that still need weights, and meshes that are
//! already rigged and left alone.

use serde::Serialize;

use crate::mesh::MeshAsset;

/// Role assignment for a list of meshes, as indices into that list.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MeshRoles {
    /// Weight donor
    pub source: Option<usize>,

    /// Meshes without weight groups, in input order
    pub targets: Vec<usize>,

    /// Other meshes that already have weight groups, in input order
    pub already_rigged: Vec<usize>,
}

/// Role assignment resolved to mesh names, for reporting.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct RoleNames {
    pub source: Option<String>,
    pub targets: Vec<String>,
    pub already_rigged: Vec<String>,
}

impl MeshRoles {
    /// Resolve indices to names against the slice that was classified.
    pub fn names(&self, meshes: &[MeshAsset]) -> RoleNames {
        let name_of = |i: &usize| meshes[*i].name.clone();
        RoleNames {
            source: self.source.as_ref().map(name_of),
            targets: self.targets.iter().map(name_of).collect(),
            already_rigged: self.already_rigged.iter().map(name_of).collect(),
        }
    }
}

/// Assign source, target and already-rigged roles.
///
/// The source is the mesh with the most weight groups; ties go to the
/// mesh with more vertices, then to the earliest mesh.
pub fn classify(meshes: &[MeshAsset]) -> MeshRoles {
    let mut source: Option<usize> = None;

    for (i, mesh) in meshes.iter().enumerate() {
        if !mesh.has_weight_groups() {
            continue;
        }

        let better = match source {
            None => true,
            Some(best) => {
                let best = &meshes[best];
                (mesh.group_count(), mesh.vertex_count) > (best.group_count(), best.vertex_count)
            }
        };

        if better {
            source = Some(i);
        }
    }

    let mut roles = MeshRoles {
        source,
        ..Default::default()
    };

    for (i, mesh) in meshes.iter().enumerate() {
        if Some(i) == source {
            continue;
        }

        if mesh.has_weight_groups() {
            roles.already_rigged.push(i);
        } else {
            roles.targets.push(i);
        }
    }

    roles
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rigged(name: &str, groups: usize, verts: usize) -> MeshAsset {
        MeshAsset::new(name, verts).with_group_names((0..groups).map(|i| format!("Bone{}", i)))
    }

    fn names(roles: &MeshRoles, meshes: &[MeshAsset]) -> RoleNames {
        roles.names(meshes)
    }

    #[test]
    fn test_body_is_source() {
        let meshes = vec![
            rigged("Body", 5, 1000),
            MeshAsset::new("Shirt", 400),
            MeshAsset::new("Pants", 300),
            rigged("Shoes", 3, 200),
        ];

        let roles = classify(&meshes);
        let resolved = names(&roles, &meshes);

        assert_eq!(resolved.source.as_deref(), Some("Body"));
        assert_eq!(resolved.targets, vec!["Shirt", "Pants"]);
        assert_eq!(resolved.already_rigged, vec!["Shoes"]);
    }

    #[test]
    fn test_tie_break_by_vertex_count() {
        let meshes = vec![rigged("Low", 4, 100), rigged("High", 4, 900)];

        let roles = classify(&meshes);
        assert_eq!(roles.source, Some(1));
        assert_eq!(roles.already_rigged, vec![0]);
    }

    #[test]
    fn test_tie_break_by_input_order() {
        let meshes = vec![
            MeshAsset::new("Hat", 50),
            rigged("First", 4, 500),
            rigged("Second", 4, 500),
        ];

        let roles = classify(&meshes);
        assert_eq!(roles.source, Some(1));
        assert_eq!(roles.targets, vec![0]);
        assert_eq!(roles.already_rigged, vec![2]);
    }

    #[test]
    fn test_no_source_when_nothing_rigged() {
        let meshes = vec![MeshAsset::new("Shirt", 10), MeshAsset::new("Pants", 10)];

        let roles = classify(&meshes);
        assert_eq!(roles.source, None);
        assert_eq!(roles.targets, vec![0, 1]);
        assert!(roles.already_rigged.is_empty());
    }

    #[test]
    fn test_classify_is_deterministic() {
        let meshes = vec![
            rigged("A", 2, 10),
            MeshAsset::new("B", 10),
            rigged("C", 2, 10),
            MeshAsset::new("D", 10),
        ];

        assert_eq!(classify(&meshes), classify(&meshes));
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(classify(&[]), MeshRoles::default());
    }
}
