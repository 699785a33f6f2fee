//! Polymorphic handles over the resolved member objects.
//!
//! A [`Member`] is what [`crate::metadata::image::MetadataImage::try_resolve_member`] hands
//! out: one variant per modeled table, each holding the shared `Arc` of the member. Two
//! resolutions of the same token return members for which [`Member::ptr_eq`] holds.
//!
//! [`WeakMember`] is the non-owning mirror, used by back-references (a custom attribute to its
//! parent, a generic parameter to its owner) so that owners and owned members never keep each
//! other alive.

use std::{
    fmt,
    sync::{Arc, Weak},
};

use crate::metadata::{
    image::MetadataImage,
    tables::{
        CustomAttribute, Event, EventMap, GenericParam, GenericParamConstraint, MemberRef,
        MethodDef, MethodSemantics, Property, PropertyMap, TableId, TypeDef, TypeDefRc, TypeRef,
        TypeRefRc, TypeSpec, TypeSpecRc,
    },
    token::Token,
};

/// Implemented by every member object type; ties it to its table and its [`Member`] variant.
pub trait MemberKind: Send + Sync + Sized + 'static {
    /// The table whose rows back this kind of member
    const TABLE: TableId;

    /// The token of this member. Members that were never written carry rid 0.
    fn token(&self) -> Token;

    /// The image this member was loaded from, or derives its image from through its owner
    fn image(&self) -> Option<Arc<MetadataImage>>;

    /// Wraps a shared member into a [`Member`]
    fn into_member(this: Arc<Self>) -> Member;

    /// Extracts a member of this kind, `None` for other kinds
    fn from_member(member: Member) -> Option<Arc<Self>>;

    /// Wraps a weak member into a [`WeakMember`]
    fn into_weak_member(this: Weak<Self>) -> WeakMember;
}

/// The uniform resolution contract.
///
/// A member resolves to itself; a type reference resolves to the type definition it names
/// when that definition lives in the same image.
pub trait Resolvable {
    /// The member this reference stands for
    fn resolve(&self) -> Member;
}

macro_rules! members {
    ($($variant:ident => $table:ident,)+) => {
        /// A resolved member object of any modeled table
        #[derive(Clone)]
        pub enum Member {
            $(
                #[doc = concat!("A row of the `", stringify!($table), "` table")]
                $variant(Arc<$variant>),
            )+
        }

        /// A non-owning reference to a member object of any modeled table
        #[derive(Clone)]
        pub enum WeakMember {
            $(
                #[doc = concat!("A row of the `", stringify!($table), "` table")]
                $variant(Weak<$variant>),
            )+
        }

        impl Member {
            /// The token of this member
            #[must_use]
            pub fn token(&self) -> Token {
                match self {
                    $(Member::$variant(member) => member.token,)+
                }
            }

            /// The table this member belongs to
            #[must_use]
            pub fn table_id(&self) -> TableId {
                match self {
                    $(Member::$variant(_) => TableId::$table,)+
                }
            }

            /// The image of this member, if it has one
            #[must_use]
            pub fn image(&self) -> Option<Arc<MetadataImage>> {
                match self {
                    $(Member::$variant(member) => member.image(),)+
                }
            }

            /// Creates a non-owning reference to this member
            #[must_use]
            pub fn downgrade(&self) -> WeakMember {
                match self {
                    $(Member::$variant(member) => WeakMember::$variant(Arc::downgrade(member)),)+
                }
            }

            /// Returns true if both handles point to the same object
            #[must_use]
            pub fn ptr_eq(&self, other: &Member) -> bool {
                match (self, other) {
                    $((Member::$variant(a), Member::$variant(b)) => Arc::ptr_eq(a, b),)+
                    _ => false,
                }
            }

            /// Address of the shared object, stable for its lifetime
            pub(crate) fn address(&self) -> usize {
                match self {
                    $(Member::$variant(member) => Arc::as_ptr(member) as usize,)+
                }
            }
        }

        impl WeakMember {
            /// Returns the member if it is still alive
            #[must_use]
            pub fn upgrade(&self) -> Option<Member> {
                match self {
                    $(WeakMember::$variant(member) => member.upgrade().map(Member::$variant),)+
                }
            }
        }

        $(
            impl MemberKind for $variant {
                const TABLE: TableId = TableId::$table;

                fn token(&self) -> Token {
                    self.token
                }

                fn image(&self) -> Option<Arc<MetadataImage>> {
                    $variant::image(self)
                }

                fn into_member(this: Arc<Self>) -> Member {
                    Member::$variant(this)
                }

                fn from_member(member: Member) -> Option<Arc<Self>> {
                    match member {
                        Member::$variant(member) => Some(member),
                        _ => None,
                    }
                }

                fn into_weak_member(this: Weak<Self>) -> WeakMember {
                    WeakMember::$variant(this)
                }
            }

            impl From<Arc<$variant>> for Member {
                fn from(member: Arc<$variant>) -> Self {
                    Member::$variant(member)
                }
            }

            impl fmt::Debug for $variant {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    f.debug_struct(stringify!($variant))
                        .field("token", &self.token)
                        .finish_non_exhaustive()
                }
            }
        )+
    };
}

members! {
    TypeRef => TypeRef,
    TypeDef => TypeDef,
    MethodDef => MethodDef,
    MemberRef => MemberRef,
    CustomAttribute => CustomAttribute,
    EventMap => EventMap,
    Event => Event,
    PropertyMap => PropertyMap,
    Property => Property,
    MethodSemantics => MethodSemantics,
    TypeSpec => TypeSpec,
    GenericParam => GenericParam,
    GenericParamConstraint => GenericParamConstraint,
}

impl Member {
    /// Returns the member as `T`, `None` if it is of another kind
    #[must_use]
    pub fn downcast<T: MemberKind>(&self) -> Option<Arc<T>> {
        T::from_member(self.clone())
    }

    /// Qualified name of named members, `None` for the unnamed ones
    #[must_use]
    pub fn full_name(&self) -> Option<String> {
        match self {
            Member::TypeRef(member) => Some(member.full_name()),
            Member::TypeDef(member) => Some(member.full_name()),
            Member::MethodDef(member) => Some(member.full_name()),
            Member::MemberRef(member) => Some(member.full_name()),
            Member::Event(member) => Some(member.full_name()),
            Member::Property(member) => Some(member.full_name()),
            Member::GenericParam(member) => Some(member.name()),
            _ => None,
        }
    }
}

impl Resolvable for Member {
    fn resolve(&self) -> Member {
        match self {
            Member::TypeRef(reference) => reference
                .definition()
                .map_or_else(|| self.clone(), Member::TypeDef),
            other => other.clone(),
        }
    }
}

impl<T: MemberKind> Resolvable for Arc<T> {
    fn resolve(&self) -> Member {
        T::into_member(self.clone()).resolve()
    }
}

impl PartialEq for Member {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl Eq for Member {}

impl fmt::Debug for Member {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Member({:?}, {})", self.table_id(), self.token())
    }
}

impl fmt::Debug for WeakMember {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.upgrade() {
            Some(member) => write!(f, "WeakMember({:?}, {})", member.table_id(), member.token()),
            None => f.write_str("WeakMember(<dropped>)"),
        }
    }
}

/// A reference into the `TypeDefOrRef` coded index: a definition, reference or specification.
#[derive(Clone)]
pub enum TypeDefOrRef {
    /// A type defined in this module
    TypeDef(TypeDefRc),
    /// A type defined elsewhere
    TypeRef(TypeRefRc),
    /// A constructed type, described by a signature
    TypeSpec(TypeSpecRc),
}

impl TypeDefOrRef {
    /// The token of the referenced type
    #[must_use]
    pub fn token(&self) -> Token {
        match self {
            TypeDefOrRef::TypeDef(ty) => ty.token,
            TypeDefOrRef::TypeRef(ty) => ty.token,
            TypeDefOrRef::TypeSpec(ty) => ty.token,
        }
    }

    /// `Namespace.Name` of definitions and references, empty for specifications
    #[must_use]
    pub fn full_name(&self) -> String {
        match self {
            TypeDefOrRef::TypeDef(ty) => ty.full_name(),
            TypeDefOrRef::TypeRef(ty) => ty.full_name(),
            TypeDefOrRef::TypeSpec(_) => String::new(),
        }
    }

    /// Converts back into the polymorphic handle
    #[must_use]
    pub fn to_member(&self) -> Member {
        match self {
            TypeDefOrRef::TypeDef(ty) => Member::TypeDef(ty.clone()),
            TypeDefOrRef::TypeRef(ty) => Member::TypeRef(ty.clone()),
            TypeDefOrRef::TypeSpec(ty) => Member::TypeSpec(ty.clone()),
        }
    }

    /// Narrows a member to a type, `None` for members that are not types
    #[must_use]
    pub fn from_member(member: Member) -> Option<Self> {
        match member {
            Member::TypeDef(ty) => Some(TypeDefOrRef::TypeDef(ty)),
            Member::TypeRef(ty) => Some(TypeDefOrRef::TypeRef(ty)),
            Member::TypeSpec(ty) => Some(TypeDefOrRef::TypeSpec(ty)),
            _ => None,
        }
    }
}

impl Resolvable for TypeDefOrRef {
    fn resolve(&self) -> Member {
        self.to_member().resolve()
    }
}

impl From<TypeDefRc> for TypeDefOrRef {
    fn from(ty: TypeDefRc) -> Self {
        TypeDefOrRef::TypeDef(ty)
    }
}

impl From<TypeRefRc> for TypeDefOrRef {
    fn from(ty: TypeRefRc) -> Self {
        TypeDefOrRef::TypeRef(ty)
    }
}

impl From<TypeSpecRc> for TypeDefOrRef {
    fn from(ty: TypeSpecRc) -> Self {
        TypeDefOrRef::TypeSpec(ty)
    }
}

impl PartialEq for TypeDefOrRef {
    fn eq(&self, other: &Self) -> bool {
        self.to_member().ptr_eq(&other.to_member())
    }
}

impl Eq for TypeDefOrRef {}

impl fmt::Debug for TypeDefOrRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypeDefOrRef({})", self.token())
    }
}
