mod ids;
pub use self::ids::*;

mod records;
pub use self::records::*;

mod node;
pub use self::node::*;
