//! Pure checks run before any marker store mutation.
//!
//! Rules are applied in a fixed order (coordinates, required parameters,
//! enabled optional parameters, spacing) and the first failure is returned.

use crate::error::ValidationError;
use aquamap_schemas::{
    draft::MarkerDraft,
    geo::Coordinates,
    marker::{Marker, MarkerFields, MarkerId},
    parameter::Parameter,
};
use geo::{Distance, Haversine, Point};

/// Minimum great-circle distance between two markers of the same store.
pub const MIN_SPACING_M: f64 = 20.0;

/// Great-circle distance in meters.
pub fn distance_m(a: Coordinates, b: Coordinates) -> f64 {
    Haversine.distance(
        Point::new(a.longitude, a.latitude),
        Point::new(b.longitude, b.latitude),
    )
}

/// Parses user-entered text as a finite number. Blank text is not a number.
pub fn parse_number(text: &str) -> Option<f64> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Applies the coordinate and parameter rules to a form and returns the
/// parsed fields. Optional parameters that are not enabled come back as
/// `None` whatever text is left in the form.
pub fn parse_draft(draft: &MarkerDraft) -> Result<MarkerFields, ValidationError> {
    let latitude = parse_number(&draft.latitude).ok_or(ValidationError::InvalidCoordinates)?;
    let longitude = parse_number(&draft.longitude).ok_or(ValidationError::InvalidCoordinates)?;
    if !Coordinates::new(latitude, longitude).is_in_range() {
        return Err(ValidationError::InvalidCoordinates);
    }

    let required = |parameter: Parameter| {
        parse_number(draft.value(parameter)).ok_or(ValidationError::InvalidParameter(parameter))
    };
    let turbidity = required(Parameter::Turbidity)?;
    let ph = required(Parameter::Ph)?;
    let temperature = required(Parameter::Temperature)?;
    let bod = required(Parameter::Bod)?;

    let optional = |parameter: Parameter| -> Result<Option<f64>, ValidationError> {
        if !draft.is_enabled(parameter) {
            return Ok(None);
        }
        parse_number(draft.value(parameter))
            .map(Some)
            .ok_or(ValidationError::MissingOptionalParameter(parameter))
    };
    let conductivity = optional(Parameter::Conductivity)?;
    let aod = optional(Parameter::Aod)?;

    Ok(MarkerFields {
        latitude,
        longitude,
        color: draft.color,
        turbidity,
        ph,
        temperature,
        bod,
        conductivity,
        aod,
    })
}

/// The coordinate and parameter rules for fields that are already numeric,
/// e.g. rows read back from a CSV export.
pub fn check_fields(fields: &MarkerFields) -> Result<(), ValidationError> {
    if !fields.coordinates().is_in_range() {
        return Err(ValidationError::InvalidCoordinates);
    }
    let required = [
        (Parameter::Turbidity, fields.turbidity),
        (Parameter::Ph, fields.ph),
        (Parameter::Temperature, fields.temperature),
        (Parameter::Bod, fields.bod),
    ];
    if let Some((parameter, _)) = required.iter().find(|(_, v)| !v.is_finite()) {
        return Err(ValidationError::InvalidParameter(*parameter));
    }
    let optional = [
        (Parameter::Conductivity, fields.conductivity),
        (Parameter::Aod, fields.aod),
    ];
    if let Some((parameter, _)) = optional
        .iter()
        .find(|(_, v)| v.map_or(false, |v| !v.is_finite()))
    {
        return Err(ValidationError::MissingOptionalParameter(*parameter));
    }
    Ok(())
}

/// The marker closest to `candidate`, skipping `exclude`.
pub fn nearest<'a, I>(
    candidate: Coordinates,
    markers: I,
    exclude: Option<&MarkerId>,
) -> Option<(&'a Marker, f64)>
where
    I: IntoIterator<Item = &'a Marker>,
{
    markers
        .into_iter()
        .filter(|m| Some(&m.id) != exclude)
        .map(|m| (m, distance_m(candidate, m.coordinates())))
        .min_by(|(_, a), (_, b)| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal))
}

/// Spacing rule: `candidate` must be at least [`MIN_SPACING_M`] from every
/// marker except `exclude`, which is the marker being edited.
pub fn check_spacing<'a, I>(
    candidate: Coordinates,
    markers: I,
    exclude: Option<&MarkerId>,
) -> Result<(), ValidationError>
where
    I: IntoIterator<Item = &'a Marker>,
{
    match nearest(candidate, markers, exclude) {
        Some((marker, distance_m)) if distance_m < MIN_SPACING_M => Err(ValidationError::TooClose {
            distance_m,
            nearest: marker.id.clone(),
        }),
        _ => Ok(()),
    }
}

/// Runs every rule against a form.
pub fn validate<'a, I>(
    draft: &MarkerDraft,
    markers: I,
    exclude: Option<&MarkerId>,
) -> Result<MarkerFields, ValidationError>
where
    I: IntoIterator<Item = &'a Marker>,
{
    let fields = parse_draft(draft)?;
    check_spacing(fields.coordinates(), markers, exclude)?;
    Ok(fields)
}
