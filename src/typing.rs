//! Pre-serialization type tagging.
//!
//! Some XML payloads carry their own type discriminator, typically an
//! `xsi:type` attribute on a union element. Types like that implement
//! [`XmlTyper`]; every request is walked with [`set_xml_types`] right before
//! it is serialized, so each of them gets a chance to fill in its
//! discriminator without the client knowing the concrete types.
//!
//! The walk works over [`Node`], a small view of a value's shape. Scalars,
//! `Option`, `Box`, `&mut`, and the standard sequences implement
//! [`XmlTyped`] already; records use the [`xml_typed!`](crate::xml_typed)
//! macro. A `Box<dyn XmlTyped>` field holds a value whose concrete type is
//! only known at runtime.
//!
//! ```
//! use soapbus::{set_xml_types, xml_typed, XmlTyper};
//!
//! #[derive(Default)]
//! struct Circle {
//!     xsi_type: String,
//!     radius: f64,
//! }
//!
//! impl XmlTyper for Circle {
//!     fn set_xml_type(&mut self) {
//!         self.xsi_type = "tns:Circle".to_string();
//!     }
//! }
//!
//! xml_typed!(Circle: XmlTyper { radius });
//!
//! struct Drawing {
//!     shapes: Vec<Circle>,
//!     highlight: Option<Box<Circle>>,
//! }
//!
//! xml_typed!(Drawing { shapes, highlight });
//!
//! let mut drawing = Drawing {
//!     shapes: vec![Circle::default(), Circle::default()],
//!     highlight: None,
//! };
//!
//! assert_eq!(set_xml_types(&mut drawing), 2);
//! assert_eq!(drawing.shapes[1].xsi_type, "tns:Circle");
//! ```

use std::collections::VecDeque;

/// A type that can set its own XML type discriminator.
pub trait XmlTyper {
    /// Fills in the type discriminator. Called once per value, before
    /// serialization.
    fn set_xml_type(&mut self);
}

/// The shape of a value, as seen by [`set_xml_types`].
pub enum Node<'a> {
    /// A value with nothing to walk into.
    Leaf,
    /// A polymorphic value, such as an enum, unwrapped to its concrete variant.
    Interface(&'a mut dyn XmlTyped),
    /// An owning or optional reference. `None` is skipped.
    Reference(Option<&'a mut dyn XmlTyped>),
    /// Elements of a sequence, in order.
    Sequence(Vec<&'a mut dyn XmlTyped>),
    /// Fields of a record.
    Record(Vec<&'a mut dyn XmlTyped>),
}

/// A value that can be walked by [`set_xml_types`].
pub trait XmlTyped {
    /// Exposes the children of this value.
    fn node(&mut self) -> Node<'_>;

    /// Returns this value as an [`XmlTyper`] if its type implements the
    /// capability.
    fn as_xml_typer(&mut self) -> Option<&mut dyn XmlTyper> {
        None
    }
}

/// Walks `value` and calls [`XmlTyper::set_xml_type`] on every node whose
/// type implements it.
///
/// Each such node is tagged exactly once, before its own children are
/// visited. Returns the number of nodes tagged.
pub fn set_xml_types(value: &mut dyn XmlTyped) -> usize {
    let mut tagged = 0;

    if let Some(typer) = value.as_xml_typer() {
        typer.set_xml_type();
        tagged += 1;
    }

    match value.node() {
        Node::Leaf | Node::Reference(None) => {}
        Node::Interface(inner) | Node::Reference(Some(inner)) => {
            tagged += set_xml_types(inner);
        }
        Node::Sequence(children) | Node::Record(children) => {
            for child in children {
                tagged += set_xml_types(child);
            }
        }
    }

    tagged
}

/// Implements [`XmlTyped`] for a record or leaf type.
///
/// * `xml_typed!(Ty)` - a leaf, nothing inside is walked.
/// * `xml_typed!(Ty { a, b })` - a record whose fields `a` and `b` are walked.
/// * `xml_typed!(Ty: XmlTyper { a, b })` - as above, and `Ty` itself
///   implements [`XmlTyper`].
/// * `xml_typed!(impl<T> Ty<T> { a, b })` - a generic record. Every type
///   parameter must implement [`XmlTyped`]. The `: XmlTyper` form works here
///   too.
///
/// Fields left out of the list are not walked, so they need no
/// [`XmlTyped`] impl.
#[macro_export]
macro_rules! xml_typed {
    (impl<$($gen:ident),+ $(,)?> $ty:ty : XmlTyper { $($field:ident),* $(,)? }) => {
        impl<$($gen: $crate::XmlTyped),+> $crate::XmlTyped for $ty
        where
            $ty: $crate::XmlTyper,
        {
            fn node(&mut self) -> $crate::Node<'_> {
                $crate::Node::Record(vec![$(&mut self.$field as &mut dyn $crate::XmlTyped),*])
            }

            fn as_xml_typer(&mut self) -> ::std::option::Option<&mut dyn $crate::XmlTyper> {
                ::std::option::Option::Some(self)
            }
        }
    };
    (impl<$($gen:ident),+ $(,)?> $ty:ty { $($field:ident),* $(,)? }) => {
        impl<$($gen: $crate::XmlTyped),+> $crate::XmlTyped for $ty {
            fn node(&mut self) -> $crate::Node<'_> {
                $crate::Node::Record(vec![$(&mut self.$field as &mut dyn $crate::XmlTyped),*])
            }
        }
    };
    ($ty:ty : XmlTyper { $($field:ident),* $(,)? }) => {
        impl $crate::XmlTyped for $ty {
            fn node(&mut self) -> $crate::Node<'_> {
                $crate::Node::Record(vec![$(&mut self.$field as &mut dyn $crate::XmlTyped),*])
            }

            fn as_xml_typer(&mut self) -> ::std::option::Option<&mut dyn $crate::XmlTyper> {
                ::std::option::Option::Some(self)
            }
        }
    };
    ($ty:ty { $($field:ident),* $(,)? }) => {
        impl $crate::XmlTyped for $ty {
            fn node(&mut self) -> $crate::Node<'_> {
                $crate::Node::Record(vec![$(&mut self.$field as &mut dyn $crate::XmlTyped),*])
            }
        }
    };
    ($ty:ty) => {
        impl $crate::XmlTyped for $ty {
            fn node(&mut self) -> $crate::Node<'_> {
                $crate::Node::Leaf
            }
        }
    };
}

macro_rules! leaf {
    ($($ty:ty),* $(,)?) => {
        $(
            impl XmlTyped for $ty {
                fn node(&mut self) -> Node<'_> {
                    Node::Leaf
                }
            }
        )*
    };
}

leaf!(
    (),
    bool,
    char,
    i8,
    i16,
    i32,
    i64,
    i128,
    isize,
    u8,
    u16,
    u32,
    u64,
    u128,
    usize,
    f32,
    f64,
    String,
    &str,
);

impl<T: XmlTyped> XmlTyped for Option<T> {
    fn node(&mut self) -> Node<'_> {
        Node::Reference(self.as_mut().map(|v| v as &mut dyn XmlTyped))
    }
}

impl<T: XmlTyped> XmlTyped for Box<T> {
    fn node(&mut self) -> Node<'_> {
        Node::Reference(Some(&mut **self as &mut dyn XmlTyped))
    }
}

impl<T: XmlTyped> XmlTyped for &mut T {
    fn node(&mut self) -> Node<'_> {
        Node::Reference(Some(&mut **self as &mut dyn XmlTyped))
    }
}

impl XmlTyped for Box<dyn XmlTyped> {
    fn node(&mut self) -> Node<'_> {
        Node::Interface(&mut **self)
    }
}

impl XmlTyped for Box<dyn XmlTyped + Send> {
    fn node(&mut self) -> Node<'_> {
        Node::Interface(&mut **self)
    }
}

impl<T: XmlTyped> XmlTyped for Vec<T> {
    fn node(&mut self) -> Node<'_> {
        Node::Sequence(self.iter_mut().map(|v| v as &mut dyn XmlTyped).collect())
    }
}

impl<T: XmlTyped> XmlTyped for VecDeque<T> {
    fn node(&mut self) -> Node<'_> {
        Node::Sequence(self.iter_mut().map(|v| v as &mut dyn XmlTyped).collect())
    }
}

impl<T: XmlTyped, const N: usize> XmlTyped for [T; N] {
    fn node(&mut self) -> Node<'_> {
        Node::Sequence(self.iter_mut().map(|v| v as &mut dyn XmlTyped).collect())
    }
}
