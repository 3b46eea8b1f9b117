mod bean;
pub use bean::{Bean, BeanType, BeanTypeBuilder};

mod dom;
pub use dom::DomNode;

mod lazy;
pub use lazy::{Lazy, LazyLoad};

mod object;
pub use object::{Object, ObjectData, ValueMap};

mod ty;
pub use ty::Type;

mod value;
pub use value::Value;

mod value_chrono;

mod value_record;
pub use value_record::ValueRecord;

mod value_set;
pub use value_set::ValueSet;
