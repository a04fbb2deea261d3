mod category_dto;

pub use category_dto::{
    CategoryInput, CategoryResponseDto, ImageInput, ImageUpload, RawField, ValidCategory,
};
