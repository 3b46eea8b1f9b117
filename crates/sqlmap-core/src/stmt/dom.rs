use super::Value;

/// A minimal DOM tree.
///
/// DOM results and DOM parameter objects are built from these nodes. Paths
/// are dotted element names relative to an element (`address.city`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomNode {
    Element {
        name: String,
        children: Vec<DomNode>,
    },
    Text(String),
}

impl DomNode {
    pub fn element(name: impl Into<String>) -> DomNode {
        DomNode::Element {
            name: name.into(),
            children: vec![],
        }
    }

    pub fn text(text: impl Into<String>) -> DomNode {
        DomNode::Text(text.into())
    }

    /// An element holding a single text child.
    pub fn text_element(name: impl Into<String>, text: impl Into<String>) -> DomNode {
        DomNode::Element {
            name: name.into(),
            children: vec![DomNode::text(text)],
        }
    }

    pub fn name(&self) -> Option<&str> {
        match self {
            DomNode::Element { name, .. } => Some(name),
            DomNode::Text(_) => None,
        }
    }

    pub fn children(&self) -> &[DomNode] {
        match self {
            DomNode::Element { children, .. } => children,
            DomNode::Text(_) => &[],
        }
    }

    /// Appends a child. Text nodes cannot have children; the call is ignored.
    pub fn append_child(&mut self, child: DomNode) {
        if let DomNode::Element { children, .. } = self {
            children.push(child);
        }
    }

    /// The concatenated text of this node and all of its descendants.
    pub fn text_content(&self) -> String {
        match self {
            DomNode::Text(text) => text.clone(),
            DomNode::Element { children, .. } => {
                children.iter().map(DomNode::text_content).collect()
            }
        }
    }

    /// The first child element with the given name.
    pub fn child(&self, name: &str) -> Option<&DomNode> {
        self.children()
            .iter()
            .find(|child| child.name() == Some(name))
    }

    fn child_mut_or_insert(&mut self, name: &str) -> Option<&mut DomNode> {
        let DomNode::Element { children, .. } = self else {
            return None;
        };

        let index = match children.iter().position(|child| child.name() == Some(name)) {
            Some(index) => index,
            None => {
                children.push(DomNode::element(name));
                children.len() - 1
            }
        };
        children.get_mut(index)
    }

    /// Follows a dotted path of element names.
    pub fn find(&self, path: &str) -> Option<&DomNode> {
        path.split('.')
            .try_fold(self, |node, step| node.child(step))
    }

    fn path_mut(&mut self, path: &str) -> Option<&mut DomNode> {
        let mut node = self;
        for step in path.split('.') {
            node = node.child_mut_or_insert(step)?;
        }
        Some(node)
    }

    /// Sets the content of the element at `path`, creating elements along the
    /// way. DOM values become the element's children; `Null` clears it; any
    /// other value is stored as text.
    pub fn set_value(&mut self, path: &str, value: Value) {
        if let Some(DomNode::Element { children, .. }) = self.path_mut(path) {
            *children = content_of(value);
        }
    }

    /// Appends to the content of the element at `path`, creating elements
    /// along the way. Each element of a collection value becomes a child.
    pub fn append_value(&mut self, path: &str, value: Value) {
        if let Some(DomNode::Element { children, .. }) = self.path_mut(path) {
            children.extend(content_of(value));
        }
    }

    /// Serializes the tree as XML.
    pub fn to_xml(&self) -> String {
        self.to_string()
    }
}

fn content_of(value: Value) -> Vec<DomNode> {
    match value {
        Value::Null => vec![],
        Value::Object(object) => match object.snapshot() {
            super::ObjectData::Dom(DomNode::Element { children, .. }) => children,
            _ => vec![DomNode::text(object.to_string())],
        },
        Value::List(items) => items.into_iter().map(item_of).collect(),
        Value::Set(items) => items.into_iter().map(item_of).collect(),
        value => vec![DomNode::text(value.to_string())],
    }
}

/// Collection elements keep their root element. DOM objects are copied, so
/// later changes to the object do not reach the tree.
fn item_of(value: Value) -> DomNode {
    match value {
        Value::Object(object) => match object.snapshot() {
            super::ObjectData::Dom(node) => node,
            _ => DomNode::text(object.to_string()),
        },
        value => DomNode::text(value.to_string()),
    }
}

fn escape(text: &str, f: &mut core::fmt::Formatter) -> core::fmt::Result {
    for c in text.chars() {
        match c {
            '&' => f.write_str("&amp;")?,
            '<' => f.write_str("&lt;")?,
            '>' => f.write_str("&gt;")?,
            c => write!(f, "{c}")?,
        }
    }
    Ok(())
}

impl core::fmt::Display for DomNode {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        match self {
            DomNode::Text(text) => escape(text, f),
            DomNode::Element { name, children } if children.is_empty() => write!(f, "<{name}/>"),
            DomNode::Element { name, children } => {
                write!(f, "<{name}>")?;
                for child in children {
                    core::fmt::Display::fmt(child, f)?;
                }
                write!(f, "</{name}>")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_value_creates_path() {
        let mut root = DomNode::element("parameter");
        root.set_value("address.city", Value::from("Oslo"));
        assert_eq!(
            root.to_xml(),
            "<parameter><address><city>Oslo</city></address></parameter>"
        );
        assert_eq!(root.find("address.city").unwrap().text_content(), "Oslo");
    }

    #[test]
    fn set_value_replaces_existing_text() {
        let mut root = DomNode::element("result");
        root.set_value("id", Value::I32(1));
        root.set_value("id", Value::I32(2));
        assert_eq!(root.to_xml(), "<result><id>2</id></result>");
    }

    #[test]
    fn append_keeps_collection_elements() {
        let mut root = DomNode::element("result");
        let line = DomNode::text_element("line", "x");
        root.append_value("lines", Value::List(vec![line.clone().into()]));
        root.append_value("lines", Value::List(vec![line.into()]));
        assert_eq!(
            root.to_xml(),
            "<result><lines><line>x</line><line>x</line></lines></result>"
        );
    }

    #[test]
    fn text_is_escaped() {
        let node = DomNode::text_element("name", "a<b & c");
        assert_eq!(node.to_xml(), "<name>a&lt;b &amp; c</name>");
    }
}
