use crate::template::TokenTemplate;

/// Largest supply the platform treats as safely representable (2^53 - 1,
/// matching the browser-side bound the deployer historically enforced).
pub const MAX_SAFE_SUPPLY: u128 = 9_007_199_254_740_991;

/// Field-level template validation failure.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("token name must be at least 3 characters")]
    NameTooShort,
    #[error("token name must be less than 50 characters")]
    NameTooLong,
    #[error("token symbol is required")]
    SymbolMissing,
    #[error("token symbol must be less than 10 characters")]
    SymbolTooLong,
    #[error("token symbol must only contain uppercase letters and numbers")]
    SymbolInvalid,
    #[error("token decimals must be between 0 and 18")]
    DecimalsOutOfRange,
    #[error("total supply must be a positive number")]
    SupplyNotPositive,
    #[error("total supply is too large")]
    SupplyTooLarge,
}

/// Validate a template's token parameters.
///
/// The current build ships fixed parameters that always pass; the routine is
/// retained for an editable-parameters mode, so the rules cover everything a
/// user could get wrong: name length 3-50, symbol 1-10 uppercase
/// alphanumeric, decimals 0-18, supply a positive decimal within
/// [`MAX_SAFE_SUPPLY`].
pub fn validate_template(template: &TokenTemplate) -> Result<(), ValidationError> {
    if template.name.chars().count() < 3 {
        return Err(ValidationError::NameTooShort);
    }
    if template.name.chars().count() > 50 {
        return Err(ValidationError::NameTooLong);
    }

    if template.symbol.is_empty() {
        return Err(ValidationError::SymbolMissing);
    }
    if template.symbol.chars().count() > 10 {
        return Err(ValidationError::SymbolTooLong);
    }
    if !template.symbol.chars().all(|c| c.is_ascii_uppercase() || c.is_ascii_digit()) {
        return Err(ValidationError::SymbolInvalid);
    }

    if template.decimals > 18 {
        return Err(ValidationError::DecimalsOutOfRange);
    }

    match template.total_supply.parse::<u128>() {
        Err(_) | Ok(0) => Err(ValidationError::SupplyNotPositive),
        Ok(supply) if supply > MAX_SAFE_SUPPLY => Err(ValidationError::SupplyTooLarge),
        Ok(_) => Ok(()),
    }
}
