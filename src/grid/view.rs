use std::cmp::Ordering;

use super::column::ColumnDef;
use super::record::GridRecord;
use crate::filter::SortDirection;
use crate::types::FieldValue;

/// Client-side view over the working set: quick filter, sort and page
#[derive(Debug, Clone)]
pub struct ViewQuery<F> {
    /// Case-insensitive text matched against formatted filterable columns
    pub filter: Option<String>,
    pub sort: Option<(F, SortDirection)>,
    /// Zero-based page index; ignored when `page_size` is `None`
    pub page: usize,
    pub page_size: Option<usize>,
}

impl<F> Default for ViewQuery<F> {
    fn default() -> Self {
        Self { filter: None, sort: None, page: 0, page_size: None }
    }
}

impl<F> ViewQuery<F> {
    pub fn page(page: usize, page_size: usize) -> Self {
        Self { page, page_size: Some(page_size), ..Default::default() }
    }

    pub fn unpaged(&self) -> Self
    where
        F: Copy,
    {
        Self { filter: self.filter.clone(), sort: self.sort, page: 0, page_size: None }
    }
}

/// Total order over cell values; nulls sort first
pub fn compare_values(a: &FieldValue, b: &FieldValue) -> Ordering {
    use FieldValue::*;
    match (a, b) {
        (Null, Null) => Ordering::Equal,
        (Null, _) => Ordering::Less,
        (_, Null) => Ordering::Greater,
        (Integer(x), Integer(y)) => x.cmp(y),
        (Decimal(_) | Integer(_), Decimal(_) | Integer(_)) => a.as_decimal().cmp(&b.as_decimal()),
        (Bool(x), Bool(y)) => x.cmp(y),
        (Date(x), Date(y)) => x.cmp(y),
        (Timestamp(x), Timestamp(y)) => x.cmp(y),
        _ => a.to_string().to_lowercase().cmp(&b.to_string().to_lowercase()),
    }
}

pub(crate) fn apply<'a, R: GridRecord>(
    rows: &'a [R],
    columns: &[ColumnDef<R::Field>],
    query: &ViewQuery<R::Field>,
) -> (Vec<&'a R>, usize) {
    let needle = query.filter.as_deref().map(str::trim).filter(|s| !s.is_empty()).map(str::to_lowercase);
    let mut matched: Vec<&R> = rows
        .iter()
        .filter(|row| match &needle {
            Some(needle) => columns
                .iter()
                .filter(|c| c.filterable)
                .any(|c| c.format(&row.get(c.field)).to_lowercase().contains(needle)),
            None => true,
        })
        .collect();

    if let Some((field, direction)) = query.sort {
        if columns.iter().any(|c| c.field == field && c.sortable) {
            matched.sort_by(|a, b| {
                let ord = compare_values(&a.get(field), &b.get(field));
                match direction {
                    SortDirection::Asc => ord,
                    SortDirection::Desc => ord.reverse(),
                }
            });
        }
    }

    let total = matched.len();
    let page = match query.page_size {
        Some(size) if size > 0 => matched.into_iter().skip(query.page * size).take(size).collect(),
        _ => matched,
    };
    (page, total)
}
