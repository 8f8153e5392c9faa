pub mod encode;
pub mod path;

/// The parameters used by the entry fuzz targets.
pub mod params {
    use willow_data_model::grouping::{Area, Range3d};
    use willow_data_model::{Entry, Path};

    pub const MCL: usize = 16;
    pub const MCC: usize = 16;
    pub const MPL: usize = 16;

    pub type FuzzNamespaceId = [u8; 2];
    pub type FuzzSubspaceId = u64;
    pub type FuzzPayloadDigest = [u8; 8];

    pub type FuzzPath = Path<MCL, MCC, MPL>;
    pub type FuzzEntry = Entry<MCL, MCC, MPL, FuzzNamespaceId, FuzzSubspaceId, FuzzPayloadDigest>;
    pub type FuzzArea = Area<MCL, MCC, MPL, FuzzSubspaceId>;
    pub type FuzzRange3d = Range3d<MCL, MCC, MPL, FuzzSubspaceId>;
}
