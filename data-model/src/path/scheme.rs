/// The limits that bound every [`Path`](super::Path): the maximum number of components, the maximum length of each component, and the maximum total length.
///
/// [`Path`](super::Path) enforces these limits at the type level via its const generic parameters. A `PathScheme` expresses the same limits as a runtime value, for checking candidate component lists before constructing a path, and for computing the widths of encoded length fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PathScheme {
    /// The maximum number of components of a path.
    pub max_component_count: usize,
    /// The maximum length in bytes of a single component.
    pub max_component_length: usize,
    /// The maximum sum of the lengths of all components of a path.
    pub max_path_length: usize,
}

impl PathScheme {
    /// Returns the scheme that [`Path<MCL, MCC, MPL>`](super::Path) enforces.
    pub const fn of<const MCL: usize, const MCC: usize, const MPL: usize>() -> Self {
        PathScheme {
            max_component_count: MCC,
            max_component_length: MCL,
            max_path_length: MPL,
        }
    }

    /// Returns whether the given components form a valid path under this scheme.
    pub fn is_valid<T: AsRef<[u8]>>(&self, components: &[T]) -> bool {
        if components.len() > self.max_component_count {
            return false;
        }

        let mut total_length: usize = 0;

        for component in components {
            let length = component.as_ref().len();

            if length > self.max_component_length {
                return false;
            }

            total_length = match total_length.checked_add(length) {
                Some(total) if total <= self.max_path_length => total,
                _ => return false,
            };
        }

        true
    }
}
