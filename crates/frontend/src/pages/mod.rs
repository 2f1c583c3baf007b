pub mod compare;
pub mod landing;
