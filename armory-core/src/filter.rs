use crate::error::ValidationError;
use crate::model::{Profession, Race};

pub const DEFAULT_PAGE_SIZE: i32 = 3;

/// Filterable player fields, each backed by exactly one stored column.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Field {
    Name,
    Title,
    Race,
    Profession,
    Experience,
    Level,
    Birthday,
    Banned,
}

impl Field {
    pub fn column(self) -> &'static str {
        match self {
            Field::Name => "name",
            Field::Title => "title",
            Field::Race => "race",
            Field::Profession => "profession",
            Field::Experience => "experience",
            Field::Level => "level",
            Field::Birthday => "birthday",
            Field::Banned => "banned",
        }
    }
}

/// Comparison applied by a single predicate fragment. `Contains` is a
/// case-sensitive substring match, unanchored at both ends.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Op {
    Contains,
    Eq,
    Ge,
    Le,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Operand {
    Text(String),
    Int(i32),
    Millis(i64),
    Bool(bool),
}

/// One filter condition contributed by one present criterion. The
/// record store conjoins all fragments with AND; conjunction is
/// associative and commutative, so composition order never matters.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Predicate {
    pub field: Field,
    pub op: Op,
    pub operand: Operand,
}

impl Predicate {
    fn new(field: Field, op: Op, operand: Operand) -> Self {
        Self { field, op, operand }
    }
}

/// Optional list/count criteria. An absent criterion contributes no
/// fragment and therefore never narrows the result set.
#[derive(Clone, Debug, Default)]
pub struct PlayerFilter {
    pub name: Option<String>,
    pub title: Option<String>,
    pub race: Option<Race>,
    pub profession: Option<Profession>,
    pub min_experience: Option<i32>,
    pub max_experience: Option<i32>,
    pub min_level: Option<i32>,
    pub max_level: Option<i32>,
    /// Earliest birthday, epoch millis, inclusive.
    pub after: Option<i64>,
    /// Latest birthday, epoch millis, inclusive.
    pub before: Option<i64>,
    pub banned: Option<bool>,
}

impl PlayerFilter {
    /// Emit one predicate fragment per present criterion. Range pairs
    /// emit zero, one, or two fragments depending on which bound is
    /// present.
    pub fn predicates(&self) -> Vec<Predicate> {
        let mut predicates = Vec::new();

        if let Some(name) = &self.name {
            predicates.push(Predicate::new(
                Field::Name,
                Op::Contains,
                Operand::Text(name.clone()),
            ));
        }

        if let Some(title) = &self.title {
            predicates.push(Predicate::new(
                Field::Title,
                Op::Contains,
                Operand::Text(title.clone()),
            ));
        }

        if let Some(race) = self.race {
            predicates.push(Predicate::new(
                Field::Race,
                Op::Eq,
                Operand::Text(race.as_str().to_owned()),
            ));
        }

        if let Some(profession) = self.profession {
            predicates.push(Predicate::new(
                Field::Profession,
                Op::Eq,
                Operand::Text(profession.as_str().to_owned()),
            ));
        }

        if let Some(min) = self.min_experience {
            predicates.push(Predicate::new(Field::Experience, Op::Ge, Operand::Int(min)));
        }
        if let Some(max) = self.max_experience {
            predicates.push(Predicate::new(Field::Experience, Op::Le, Operand::Int(max)));
        }

        if let Some(min) = self.min_level {
            predicates.push(Predicate::new(Field::Level, Op::Ge, Operand::Int(min)));
        }
        if let Some(max) = self.max_level {
            predicates.push(Predicate::new(Field::Level, Op::Le, Operand::Int(max)));
        }

        if let Some(after) = self.after {
            predicates.push(Predicate::new(
                Field::Birthday,
                Op::Ge,
                Operand::Millis(after),
            ));
        }
        if let Some(before) = self.before {
            predicates.push(Predicate::new(
                Field::Birthday,
                Op::Le,
                Operand::Millis(before),
            ));
        }

        if let Some(banned) = self.banned {
            predicates.push(Predicate::new(Field::Banned, Op::Eq, Operand::Bool(banned)));
        }

        predicates
    }
}

/// Zero-based pagination applied after filtering and sorting.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PageRequest {
    page_number: i32,
    page_size: i32,
}

impl PageRequest {
    /// Build a page request from optional query values. Defaults are
    /// page 0 with size 3; a negative page number or a non-positive
    /// page size is rejected outright.
    pub fn new(page_number: Option<i32>, page_size: Option<i32>) -> Result<Self, ValidationError> {
        let page_number = page_number.unwrap_or(0);
        let page_size = page_size.unwrap_or(DEFAULT_PAGE_SIZE);

        if page_number < 0 {
            return Err(ValidationError::InvalidField("pageNumber"));
        }
        if page_size < 1 {
            return Err(ValidationError::InvalidField("pageSize"));
        }

        Ok(Self {
            page_number,
            page_size,
        })
    }

    pub fn limit(self) -> i64 {
        i64::from(self.page_size)
    }

    pub fn offset(self) -> i64 {
        i64::from(self.page_number) * i64::from(self.page_size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_criteria_emit_no_fragments() {
        assert!(PlayerFilter::default().predicates().is_empty());
    }

    #[test]
    fn range_criteria_are_tri_state() {
        let mut filter = PlayerFilter {
            min_experience: Some(100),
            ..PlayerFilter::default()
        };
        assert_eq!(
            filter.predicates(),
            vec![Predicate::new(
                Field::Experience,
                Op::Ge,
                Operand::Int(100)
            )]
        );

        filter.min_experience = None;
        filter.max_experience = Some(900);
        assert_eq!(
            filter.predicates(),
            vec![Predicate::new(
                Field::Experience,
                Op::Le,
                Operand::Int(900)
            )]
        );

        filter.min_experience = Some(100);
        assert_eq!(filter.predicates().len(), 2);
    }

    #[test]
    fn banned_filter_is_tri_state() {
        let mut filter = PlayerFilter::default();
        assert!(filter.predicates().is_empty());

        filter.banned = Some(true);
        assert_eq!(
            filter.predicates(),
            vec![Predicate::new(Field::Banned, Op::Eq, Operand::Bool(true))]
        );

        filter.banned = Some(false);
        assert_eq!(
            filter.predicates(),
            vec![Predicate::new(Field::Banned, Op::Eq, Operand::Bool(false))]
        );
    }

    #[test]
    fn every_criterion_contributes_exactly_one_fragment() {
        let filter = PlayerFilter {
            name: Some("do".to_owned()),
            title: Some("bearer".to_owned()),
            race: Some(crate::model::Race::Hobbit),
            profession: Some(crate::model::Profession::Rogue),
            min_experience: Some(0),
            max_experience: Some(9000),
            min_level: Some(1),
            max_level: Some(10),
            after: Some(0),
            before: Some(i64::MAX),
            banned: Some(false),
        };

        assert_eq!(filter.predicates().len(), 11);
    }

    #[test]
    fn enum_criteria_compare_symbolic_names() {
        let filter = PlayerFilter {
            race: Some(crate::model::Race::Orc),
            ..PlayerFilter::default()
        };
        assert_eq!(
            filter.predicates(),
            vec![Predicate::new(
                Field::Race,
                Op::Eq,
                Operand::Text("ORC".to_owned())
            )]
        );
    }

    #[test]
    fn page_request_defaults() {
        let page = PageRequest::new(None, None).unwrap();
        assert_eq!(page.limit(), 3);
        assert_eq!(page.offset(), 0);
    }

    #[test]
    fn page_request_offset_math() {
        let page = PageRequest::new(Some(2), Some(10)).unwrap();
        assert_eq!(page.limit(), 10);
        assert_eq!(page.offset(), 20);
    }

    #[test]
    fn page_request_rejects_bad_values() {
        assert_eq!(
            PageRequest::new(Some(-1), None),
            Err(ValidationError::InvalidField("pageNumber"))
        );
        assert_eq!(
            PageRequest::new(None, Some(0)),
            Err(ValidationError::InvalidField("pageSize"))
        );
        assert_eq!(
            PageRequest::new(None, Some(-3)),
            Err(ValidationError::InvalidField("pageSize"))
        );
    }
}
