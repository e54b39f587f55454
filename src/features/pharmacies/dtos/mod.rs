mod pharmacy_dto;
mod query_dto;

pub use pharmacy_dto::{
    CreatePharmacyDto, GuardDutyResultDto, OpeningHoursEntryDto, PharmacyResponseDto,
    PharmacySearchResultDto, UpdatePharmacyDto,
};
pub use query_dto::{GuardDutyQueryParams, SearchQueryParams};
