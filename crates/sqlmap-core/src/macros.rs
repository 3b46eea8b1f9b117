/// Builds a `Value::Object` holding an associative map.
///
/// ```
/// let order = sqlmap_core::map! { "id" => 1, "status" => "open" };
/// assert!(order.is_object());
/// ```
#[macro_export]
macro_rules! map {
    () => {
        $crate::stmt::Value::Object($crate::stmt::Object::map())
    };
    ( $( $key:expr => $value:expr ),+ $(,)? ) => {{
        let mut map = $crate::stmt::ValueMap::new();
        $( map.insert(::std::string::String::from($key), $crate::stmt::Value::from($value)); )+
        $crate::stmt::Value::Object($crate::stmt::Object::from_map(map))
    }};
}
