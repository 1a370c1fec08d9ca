//! Selector data model.
//!
//! Types follow [Selectors Level 4](https://www.w3.org/TR/selectors-4/):
//! a parsed selector is a chain of compound selectors joined by combinators,
//! where each compound is a set of simultaneous conditions on one element.

/// [§ 5 Elemental selectors](https://www.w3.org/TR/selectors-4/#elemental-selectors)
/// [§ 6 Attribute selectors](https://www.w3.org/TR/selectors-4/#attribute-selectors)
///
/// A simple selector is a single condition on an element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SimpleSelector {
    /// [§ 5.1 Type selector](https://www.w3.org/TR/selectors-4/#type-selectors)
    /// "A type selector is the name of a document language element type."
    ///
    /// Examples: `div`, `input`, `li`
    Type(String),

    /// [§ 6.6 Class selector](https://www.w3.org/TR/selectors-4/#class-html)
    /// "The class selector is given as a full stop (. U+002E) immediately
    /// followed by an identifier."
    ///
    /// Examples: `.price`, `.nav-item`
    Class(String),

    /// [§ 6.7 ID selector](https://www.w3.org/TR/selectors-4/#id-selectors)
    /// "An ID selector is a hash (#, U+0023) immediately followed by the
    /// ID value, which is an identifier."
    ///
    /// Examples: `#app`, `#checkout-total`
    Id(String),

    /// [§ 5.2 Universal selector](https://www.w3.org/TR/selectors-4/#universal-selector)
    /// "The universal selector is a single asterisk (*)."
    Universal,

    /// [§ 6.4 Attribute selectors](https://www.w3.org/TR/selectors-4/#attribute-selectors)
    ///
    /// Examples: `[name="email"]`, `[href^=https]`, `[data-qa*=row]`
    Attribute(AttributeSelector),

    /// [§ 4 Pseudo-classes](https://www.w3.org/TR/selectors-4/#pseudo-classes)
    /// Structural pseudo-class that requires DOM tree context to match.
    ///
    /// Examples: `:first-child`, `:nth-of-type(2)`, `:empty`
    PseudoClass(PseudoClass),

    /// Pseudo-class or pseudo-element that always fails to match.
    ///
    /// Interactive states (`:hover`, `:focus`, ...), pseudo-elements
    /// (`::before`, ...), and unsupported functional pseudo-classes
    /// (`:not(...)`, `:nth-child(an+b)`, ...) degrade to this rather than
    /// making the whole selector unparseable.
    NeverMatch,
}

/// Structural pseudo-classes per [§ 4 Pseudo-classes](https://www.w3.org/TR/selectors-4/#pseudo-classes).
///
/// Only the tree-structural and form-state classes a clipping target can
/// meaningfully carry are modeled; everything else is [`SimpleSelector::NeverMatch`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PseudoClass {
    /// [§ 4.4 :root](https://www.w3.org/TR/selectors-4/#the-root-pseudo)
    /// "...an element that is the root of the document" — the `<html>` element.
    Root,

    /// [§ 4.12 :first-child](https://www.w3.org/TR/selectors-4/#the-first-child-pseudo)
    /// "...an element that is first among its inclusive siblings."
    FirstChild,

    /// [§ 4.12 :last-child](https://www.w3.org/TR/selectors-4/#the-last-child-pseudo)
    /// "...an element that is last among its inclusive siblings."
    LastChild,

    /// [§ 4.11 :first-of-type](https://www.w3.org/TR/selectors-4/#the-first-of-type-pseudo)
    /// "...an element that is the first sibling of its type."
    FirstOfType,

    /// [§ 4.11 :last-of-type](https://www.w3.org/TR/selectors-4/#the-last-of-type-pseudo)
    /// "...an element that is the last sibling of its type."
    LastOfType,

    /// [§ 4.11 :nth-of-type()](https://www.w3.org/TR/selectors-4/#the-nth-of-type-pseudo)
    /// "...an element that has an+b-1 siblings with the same expanded element
    /// name before it in the document tree."
    ///
    /// Only the integer form is modeled (1-based position among same-tag
    /// siblings) — that is the form the selector generator emits. The full
    /// `an+b` notation degrades to [`SimpleSelector::NeverMatch`].
    NthOfType(usize),

    /// [§ 4.12 :only-child](https://www.w3.org/TR/selectors-4/#the-only-child-pseudo)
    /// "...an element that has no siblings."
    OnlyChild,

    /// [§ 4.5 :empty](https://www.w3.org/TR/selectors-4/#the-empty-pseudo)
    /// "...an element that has no children at all."
    Empty,

    /// :disabled — form element with the disabled attribute
    Disabled,

    /// :enabled — form element without the disabled attribute
    Enabled,
}

/// Attribute selectors per [§ 6.4](https://www.w3.org/TR/selectors-4/#attribute-selectors).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttributeSelector {
    /// `[attr]` — "Represents an element with the att attribute"
    Exists(String),

    /// `[attr=value]` — "...whose value is exactly 'val'."
    Equals(String, String),

    /// `[attr~=value]` — "...a whitespace-separated list of words, one of
    /// which is exactly 'val'."
    Includes(String, String),

    /// `[attr|=value]` — "...either being exactly 'val' or beginning with
    /// 'val' immediately followed by '-'."
    DashMatch(String, String),

    /// `[attr^=value]` — "...whose value begins with the prefix 'val'."
    PrefixMatch(String, String),

    /// `[attr$=value]` — "...whose value ends with the suffix 'val'."
    SuffixMatch(String, String),

    /// `[attr*=value]` — "...contains at least one instance of the substring
    /// 'val'."
    SubstringMatch(String, String),
}

/// [§ 4.2 Compound selectors](https://www.w3.org/TR/selectors-4/#compound)
///
/// "A compound selector is a sequence of simple selectors that are not
/// separated by a combinator, and represents a set of simultaneous
/// conditions on a single element."
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompoundSelector {
    /// The list of simple selectors that make up this compound selector.
    pub simple_selectors: Vec<SimpleSelector>,
}

/// [§ 16 Combinators](https://www.w3.org/TR/selectors-4/#combinators)
///
/// "A combinator is punctuation that represents a particular kind of
/// relationship between the selectors on either side."
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Combinator {
    /// [§ 16.1](https://www.w3.org/TR/selectors-4/#descendant-combinators)
    /// `A B` — B is an arbitrary descendant of A. Written as whitespace.
    Descendant,

    /// [§ 16.2](https://www.w3.org/TR/selectors-4/#child-combinators)
    /// `A > B` — B is a direct child of A. The generator emits this form
    /// for its ancestor paths.
    Child,

    /// [§ 16.3](https://www.w3.org/TR/selectors-4/#adjacent-sibling-combinators)
    /// `A + B` — B immediately follows A under the same parent.
    NextSibling,

    /// [§ 16.4](https://www.w3.org/TR/selectors-4/#general-sibling-combinators)
    /// `A ~ B` — B follows A (not necessarily immediately) under the same
    /// parent.
    SubsequentSibling,
}

/// [§ 4.3 Complex selectors](https://www.w3.org/TR/selectors-4/#complex)
///
/// "A complex selector is a chain of one or more compound selectors separated
/// by combinators."
///
/// Example: `div#app > ul li.row`
/// ```text
/// [div#app] --(Child)--> [ul] --(Descendant)--> [li.row]
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComplexSelector {
    /// The rightmost compound selector (the subject of the selector).
    ///
    /// [§ 4.3](https://www.w3.org/TR/selectors-4/#complex)
    /// "The elements represented by a complex selector are the elements
    /// matched by the last compound selector in the complex selector."
    pub subject: CompoundSelector,

    /// Chain of (combinator, compound) pairs going left from the subject.
    /// Empty for a bare compound selector.
    ///
    /// For `A > B C`: subject is C, combinators are
    /// `[(Descendant, B), (Child, A)]` — right-to-left, because matching
    /// walks up from the subject.
    pub combinators: Vec<(Combinator, CompoundSelector)>,
}

/// [§ 17 Calculating Specificity](https://www.w3.org/TR/selectors-4/#specificity-rules)
///
/// "A selector's specificity is calculated for a given element as follows:
///  - count the number of ID selectors in the selector (= A)
///  - count the number of class selectors, attributes selectors, and
///    pseudo-classes in the selector (= B)
///  - count the number of type selectors and pseudo-elements in the
///    selector (= C)"
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct Specificity(pub u32, pub u32, pub u32);

impl Specificity {
    /// Create a new specificity with (A, B, C) components.
    #[must_use]
    pub const fn new(a: u32, b: u32, c: u32) -> Self {
        Self(a, b, c)
    }
}

/// A parsed CSS selector ready for matching.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedSelector {
    /// The complex selector (compound selectors with combinators).
    pub complex: ComplexSelector,
    /// The specificity of this selector.
    pub specificity: Specificity,
}

impl ParsedSelector {
    /// Check if this is a simple selector (no combinators).
    #[must_use]
    pub const fn is_simple(&self) -> bool {
        self.complex.combinators.is_empty()
    }
}

impl ComplexSelector {
    /// [§ 17 Calculating Specificity](https://www.w3.org/TR/selectors-4/#specificity-rules)
    ///
    /// Calculate specificity for the entire complex selector by summing the
    /// specificity of all compound selectors in the chain.
    #[must_use]
    pub fn calculate_specificity(&self) -> Specificity {
        let mut spec = compound_specificity(&self.subject);

        for (_, compound) in &self.combinators {
            let compound_spec = compound_specificity(compound);
            spec.0 += compound_spec.0;
            spec.1 += compound_spec.1;
            spec.2 += compound_spec.2;
        }

        spec
    }
}

/// Calculate specificity for a single compound selector.
fn compound_specificity(compound: &CompoundSelector) -> Specificity {
    let mut spec = Specificity::default();

    for simple in &compound.simple_selectors {
        match simple {
            // "count the number of ID selectors in the selector (= A)"
            SimpleSelector::Id(_) => spec.0 += 1,

            // "count the number of class selectors, attributes selectors,
            // and pseudo-classes in the selector (= B)"
            SimpleSelector::Class(_)
            | SimpleSelector::PseudoClass(_)
            | SimpleSelector::Attribute(_) => spec.1 += 1,

            // "count the number of type selectors and pseudo-elements
            // in the selector (= C)"
            SimpleSelector::Type(_) => spec.2 += 1,

            // "ignore the universal selector"
            // NeverMatch contributes 0: the compound can never match anyway.
            SimpleSelector::Universal | SimpleSelector::NeverMatch => {}
        }
    }

    spec
}
