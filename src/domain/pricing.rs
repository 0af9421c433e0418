use super::{Paise, half, rupees};

/// Anything that can be priced from the four fields of a job listing.
pub trait Priced {
    fn title(&self) -> &str;
    fn min_salary(&self) -> u64;
    fn max_salary(&self) -> u64;
    fn location(&self) -> &str;

    /// Posting and application price of this listing.
    fn price(&self) -> Paise {
        price(self.title(), self.min_salary(), self.max_salary(), self.location())
    }

    /// Share of the application price credited to the posting company.
    fn company_share(&self) -> Paise {
        half(self.price())
    }
}

/// One rupee per UTF-16 code unit of title and location, plus one per
/// decimal digit of each salary bound.
pub fn price(title: &str, min_salary: u64, max_salary: u64, location: &str) -> Paise {
    let length = title.encode_utf16().count()
        + decimal_len(min_salary)
        + decimal_len(max_salary)
        + location.encode_utf16().count();
    rupees(length as i64)
}

fn decimal_len(value: u64) -> usize {
    value.to_string().len()
}
