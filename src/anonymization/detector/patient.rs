//! Patient name detector
//!
//! Finds mentions of the patient using the name variants carried in the
//! request metadata. A variant matches in its own casing, fully in capitals
//! (`HARTSUIKER` for `Hartsuiker`) or capitalised (`Jansen` for `JANSEN`,
//! `De Jong` for `de Jong`). All-lower-case renderings are ordinary words:
//! `jong` is kept when the surname is `Jong`.

use super::Detector;
use crate::anonymization::models::{
    Annotation, AnnotationRequest, EntityCategory, PatientMetadata,
};
use anyhow::Result;
use std::collections::HashSet;

/// Shortest variant, in characters, that may match on its own
const MIN_VARIANT_CHARS: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum VariantKind {
    /// Matches anywhere on word boundaries
    Name,
    /// A one-letter initial such as `J.`, only kept right before a name
    LoneInitial,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Variant {
    text: String,
    kind: VariantKind,
}

/// Detector for patient name variants
#[derive(Debug, Default, Clone, Copy)]
pub struct PatientNameDetector;

impl PatientNameDetector {
    pub fn new() -> Self {
        Self
    }

    /// Surface forms to look for
    fn variants(patient: &PatientMetadata) -> Vec<Variant> {
        let mut variants: Vec<Variant> = Vec::new();
        let mut push = |text: String, kind: VariantKind| {
            if let Some(existing) = variants.iter_mut().find(|v| v.text == text) {
                if kind == VariantKind::Name {
                    existing.kind = VariantKind::Name;
                }
            } else {
                variants.push(Variant { text, kind });
            }
        };

        if let Some(first_names) = patient.first_names.as_deref() {
            let names: Vec<&str> = first_names.split_whitespace().collect();
            let mut derived = String::new();

            for name in &names {
                if name.chars().count() >= MIN_VARIANT_CHARS {
                    push(name.to_string(), VariantKind::Name);
                }
                if let Some(first) = name.chars().next().filter(|c| c.is_alphabetic()) {
                    let initial: String = first.to_uppercase().chain(['.']).collect();
                    derived.push_str(&initial);
                    push(initial, VariantKind::LoneInitial);
                }
            }

            if names.len() > 1 {
                push(derived, VariantKind::Name);
            }
        }

        if let Some(initials) = patient.initials.as_deref() {
            let letters = initials.chars().filter(|c| c.is_alphabetic()).count();
            match letters {
                0 => {}
                1 => push(initials.to_string(), VariantKind::LoneInitial),
                _ => push(initials.to_string(), VariantKind::Name),
            }
        }

        // `RABBIT,P.` is matched without its dot, which may be punctuation
        let capitals = patient
            .surname_capitals
            .as_deref()
            .map(|capitals| capitals.strip_suffix('.').unwrap_or(capitals));

        for surname in [
            patient.surname.as_deref(),
            patient.surname_secondary.as_deref(),
            capitals,
        ]
        .into_iter()
        .flatten()
        {
            if surname.chars().count() >= MIN_VARIANT_CHARS {
                push(surname.to_string(), VariantKind::Name);
            }
        }

        variants
    }

    /// Casings a variant is recognised in
    ///
    /// Forms without any capital letter are left out, so a lower-case word
    /// never counts as a name.
    fn forms(variant: &str) -> Vec<String> {
        let mut forms: Vec<String> = Vec::new();
        for form in [
            variant.to_string(),
            variant.to_uppercase(),
            capitalize_words(variant),
            capitalize_first(variant),
        ] {
            if form.chars().any(char::is_uppercase) && !forms.contains(&form) {
                forms.push(form);
            }
        }
        forms
    }

    /// All word-bounded occurrences of a variant in any of its forms
    fn occurrences(text: &str, variant: &str) -> Vec<(usize, usize)> {
        let mut spans = Vec::new();
        for form in &Self::forms(variant) {
            for (start, matched) in text.match_indices(form.as_str()) {
                let end = start + matched.len();
                if on_word_boundary(text, start, end) {
                    spans.push((start, end));
                }
            }
        }
        spans
    }

    fn detect_in_string(&self, text: &str, patient: &PatientMetadata) -> Vec<Annotation> {
        let variants = Self::variants(patient);

        let mut names = Vec::new();
        let mut initials = Vec::new();
        for variant in &variants {
            let target = match variant.kind {
                VariantKind::Name => &mut names,
                VariantKind::LoneInitial => &mut initials,
            };
            target.extend(Self::occurrences(text, &variant.text));
        }

        let name_starts: HashSet<usize> = names.iter().map(|(start, _)| *start).collect();
        initials.retain(|&(_, end)| {
            let gap = text[end..]
                .char_indices()
                .find(|(_, c)| !c.is_whitespace())
                .map(|(idx, _)| idx)
                .unwrap_or(text.len() - end);
            gap > 0 && name_starts.contains(&(end + gap))
        });

        names
            .into_iter()
            .chain(initials)
            .map(|(start, end)| {
                Annotation::new(EntityCategory::Patient, &text[start..end], start, end)
            })
            .collect()
    }
}

impl Detector for PatientNameDetector {
    fn detect(&self, request: &AnnotationRequest) -> Result<Vec<Annotation>> {
        match request.patient.as_ref() {
            Some(patient) if !request.is_disabled(EntityCategory::Patient) => {
                Ok(self.detect_in_string(&request.text, patient))
            }
            _ => Ok(Vec::new()),
        }
    }

}

/// `JANSEN` and `jansen` become `Jansen`, `de jong` becomes `De Jong`
fn capitalize_words(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut word_start = true;
    for c in text.chars() {
        if word_start {
            out.extend(c.to_uppercase());
        } else {
            out.extend(c.to_lowercase());
        }
        word_start = !c.is_alphanumeric();
    }
    out
}

/// Upper-cases only the first letter: `van der Berg` becomes `Van der Berg`
fn capitalize_first(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Neither neighbour of the span is a letter or digit
fn on_word_boundary(text: &str, start: usize, end: usize) -> bool {
    let before = text[..start].chars().next_back();
    let after = text[end..].chars().next();
    !before.is_some_and(char::is_alphanumeric) && !after.is_some_and(char::is_alphanumeric)
}
