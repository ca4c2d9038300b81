//! # Sample Dataset
//!
//! A small, self-consistent dataset for demos and tests: the UNECE R67 LPG
//! regulation, two versions of an EU battery directive, an NHTSA airbag
//! rule, and an EV platform with a partial test inventory.

use regtrace_core::{
    Market, Product, ProductId, Regulation, RegulationId, TestId, Timestamp, ValidationError,
};

/// Source label on sample records.
pub const SAMPLE_SOURCE: &str = "sample";

/// Regulations and the product they are measured against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SampleDataset {
    /// Sample regulations, oldest first.
    pub regulations: Vec<Regulation>,
    /// Sample product.
    pub product: Product,
}

/// Build the sample dataset.
pub fn sample_dataset() -> Result<SampleDataset, ValidationError> {
    Ok(SampleDataset {
        regulations: sample_regulations()?,
        product: sample_product()?,
    })
}

/// The sample regulations.
pub fn sample_regulations() -> Result<Vec<Regulation>, ValidationError> {
    let r67 = Regulation::new(
        RegulationId::new("UNECE-R67")?,
        Market::new("UNECE")?,
        "UN Regulation No. 67 - LPG equipment",
        "1.0",
        Timestamp::from_ymd(2008, 2, 21)?,
        "LPG equipment installed in the vehicle shall be approved. \
         The LPG tank shall withstand a leak test at high pressure without fire. \
         The multivalve shall include a safety valve and a shut-off valve. \
         Manufacturers shall provide installation documentation. \
         The marking of the container shall be permanent and legible.",
    )?
    .with_url("https://unece.org/transport/vehicle-regulations")
    .with_source(SAMPLE_SOURCE);

    let batt_v1 = Regulation::new(
        RegulationId::new("EU-BATT-2025-V1")?,
        Market::new("EU")?,
        "Battery Directive 2025 - Version 1",
        "1.0",
        Timestamp::from_ymd(2025, 1, 15)?,
        "Electric vehicle batteries must withstand a temperature of 60°C for 30 minutes \
         without leak or fire. \
         Manufacturers shall provide a thermal test report for each battery type.",
    )?
    .with_url("https://example.org/eu-batt-2025-v1")
    .with_source(SAMPLE_SOURCE);

    let batt_v1_id = batt_v1.id.clone();
    let batt_v2 = Regulation::new(
        RegulationId::new("EU-BATT-2025-V2")?,
        Market::new("EU")?,
        "Battery Directive 2025 - Version 2",
        "1.1",
        Timestamp::from_ymd(2025, 9, 1)?,
        "Electric vehicle batteries must withstand a temperature of 70°C for 30 minutes \
         without leak or fire. \
         Manufacturers shall provide a thermal test report for each battery type \
         and repeat the durability test every 2 years.",
    )?
    .with_url("https://example.org/eu-batt-2025-v2")
    .with_source(SAMPLE_SOURCE)
    .with_previous_version(batt_v1_id);

    let airbag = Regulation::new(
        RegulationId::new("US-NHTSA-AIRBAG-2025-V1")?,
        Market::new("USA")?,
        "NHTSA Airbag Safety Rule 2025",
        "1.0",
        Timestamp::from_ymd(2025, 3, 10)?,
        "The airbag system must deploy within 30 milliseconds in frontal collisions. \
         Manufacturers shall provide a validation report with at least 20 crash tests.",
    )?
    .with_url("https://example.org/us-nhtsa-airbag-2025-v1")
    .with_source(SAMPLE_SOURCE);

    Ok(vec![r67, batt_v1, batt_v2, airbag])
}

/// The sample product. Its inventory deliberately lacks fire and crash
/// tests so the sample shows both compliant and non-compliant markets.
pub fn sample_product() -> Result<Product, ValidationError> {
    let markets = ["EU", "UNECE", "USA"]
        .into_iter()
        .map(Market::new)
        .collect::<Result<Vec<_>, _>>()?;
    let tests = [
        "TEST_PRESSURE",
        "TEST_LEAK",
        "TEST_THERMAL",
        "TEST_DURABILITY",
        "TEST_DURABILITY_CYCLES",
        "TEST_TRACEABILITY",
        "TEST_CRASH_ISOLATION",
    ]
    .into_iter()
    .map(TestId::new)
    .collect::<Result<Vec<_>, _>>()?;
    Ok(
        Product::new(ProductId::new("VEH-EV-01")?, "EV Platform")
            .with_markets(markets)
            .with_tests(tests),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dataset_builds() {
        let data = sample_dataset().unwrap();
        assert_eq!(data.regulations.len(), 4);
        assert!(data.regulations.iter().all(|r| r.source == SAMPLE_SOURCE));
        assert_eq!(data.product.id.as_str(), "VEH-EV-01");
    }

    #[test]
    fn battery_directive_has_lineage() {
        let regs = sample_regulations().unwrap();
        let v2 = regs.iter().find(|r| r.id.as_str() == "EU-BATT-2025-V2").unwrap();
        assert_eq!(v2.previous_version_id.as_ref().unwrap().as_str(), "EU-BATT-2025-V1");
        assert_eq!(v2.version, "1.1");
    }

    #[test]
    fn product_lacks_fire_test() {
        let p = sample_product().unwrap();
        assert!(p.has_test(&TestId::new("TEST_LEAK").unwrap()));
        assert!(!p.has_test(&TestId::new("TEST_FIRE").unwrap()));
        assert!(p.sold_in(&Market::new("UNECE").unwrap()));
    }
}
