#![doc = include_str!(concat!("../", env!("CARGO_PKG_README")))]

#[doc(inline)]
pub use kernelfx_image as image;

#[doc(inline)]
pub use kernelfx_imgproc as imgproc;
