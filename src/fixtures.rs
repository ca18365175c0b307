//! Sample test device shared by the unit tests.
//!
//! The typed structs mirror what a model generator emits: optional leaves
//! are `Option`s, lists are `Vec`s, and `ConfigNode` is a `match` on the
//! YANG name.

use crate::data::{ConfigNode, DataNode, Field, LeafValue};
use crate::schema::SchemaIndex;

pub(crate) const T1_NAMESPACE: &str = "urn:example:testdevice-1";
pub(crate) const T2_NAMESPACE: &str = "urn:example:testdevice-2";

pub(crate) fn schema() -> SchemaIndex {
    SchemaIndex::builder("device")
        .module("testdevice-1", "t1", T1_NAMESPACE)
        .module("testdevice-2", "t2", T2_NAMESPACE)
        .define("t1", |m| {
            m.container("cont1a", |c| {
                c.container("cont2a", |c| {
                    c.leaf("leaf2a")
                        .leaf("leaf2b")
                        .leaf("leaf2c")
                        .leaf("leaf2d")
                        .leaf_list("leaf2e")
                        .leaf("leaf2f")
                        .leaf("leaf2g");
                })
                .leaf("leaf1a")
                .list("list2a", &["name"], |l| {
                    l.leaf("name").leaf("rx-power").leaf("tx-power");
                });
            })
            .container("cont1b-state", |c| {
                // keys declared after a non-key leaf on purpose
                c.list("list2b", &["index1", "index2"], |l| {
                    l.leaf("leaf3c").leaf("index1").leaf("leaf3d").leaf("index2");
                })
                .augment("t2", |a| {
                    a.leaf("note");
                });
            });
        })
        .build()
        .expect("fixture schema is valid")
}

#[derive(Debug, Default)]
pub(crate) struct Device {
    pub cont1a: Option<Cont1a>,
    pub cont1b_state: Option<Cont1bState>,
}

#[derive(Debug, Default)]
pub(crate) struct Cont1a {
    pub cont2a: Option<Cont2a>,
    pub leaf1a: Option<String>,
    pub list2a: Vec<List2a>,
}

#[derive(Debug, Default)]
pub(crate) struct Cont2a {
    pub leaf2a: Option<u8>,
    pub leaf2b: Option<f64>,
    pub leaf2c: Option<String>,
    pub leaf2d: Option<i16>,
    pub leaf2e: Vec<i16>,
    pub leaf2f: Option<Vec<u8>>,
    pub leaf2g: Option<bool>,
}

#[derive(Debug, Default)]
pub(crate) struct List2a {
    pub name: String,
    pub rx_power: Option<u16>,
    pub tx_power: Option<u16>,
}

#[derive(Debug, Default)]
pub(crate) struct Cont1bState {
    pub list2b: Vec<List2b>,
    pub note: Option<String>,
}

#[derive(Debug, Default)]
pub(crate) struct List2b {
    pub index1: u8,
    pub index2: u8,
    pub leaf3c: Option<String>,
    pub leaf3d: Option<String>,
}

fn leaf<T: Clone + Into<LeafValue>>(value: &Option<T>) -> Option<Field<'static>> {
    value.clone().map(|v| Field::Leaf(v.into()))
}

fn container<T: ConfigNode>(node: &Option<T>) -> Option<Field<'_>> {
    node.as_ref().map(|n| Field::Container(n as &dyn ConfigNode))
}

fn list<T: ConfigNode>(entries: &Vec<T>) -> Option<Field<'_>> {
    (!entries.is_empty()).then(|| Field::List(entries))
}

fn set(names: &[(&'static str, bool)]) -> Vec<&'static str> {
    names.iter().filter(|(_, set)| *set).map(|(n, _)| *n).collect()
}

impl ConfigNode for Device {
    fn field(&self, name: &str) -> Option<Field<'_>> {
        match name {
            "cont1a" => container(&self.cont1a),
            "cont1b-state" => container(&self.cont1b_state),
            _ => None,
        }
    }

    fn field_names(&self) -> Vec<&str> {
        set(&[
            ("cont1a", self.cont1a.is_some()),
            ("cont1b-state", self.cont1b_state.is_some()),
        ])
    }
}

impl ConfigNode for Cont1a {
    fn field(&self, name: &str) -> Option<Field<'_>> {
        match name {
            "cont2a" => container(&self.cont2a),
            "leaf1a" => leaf(&self.leaf1a),
            "list2a" => list(&self.list2a),
            _ => None,
        }
    }

    fn field_names(&self) -> Vec<&str> {
        set(&[
            ("cont2a", self.cont2a.is_some()),
            ("leaf1a", self.leaf1a.is_some()),
            ("list2a", !self.list2a.is_empty()),
        ])
    }
}

impl ConfigNode for Cont2a {
    fn field(&self, name: &str) -> Option<Field<'_>> {
        match name {
            "leaf2a" => leaf(&self.leaf2a),
            "leaf2b" => leaf(&self.leaf2b),
            "leaf2c" => leaf(&self.leaf2c),
            "leaf2d" => leaf(&self.leaf2d),
            "leaf2e" => (!self.leaf2e.is_empty())
                .then(|| Field::Leaf(self.leaf2e.iter().copied().collect())),
            "leaf2f" => leaf(&self.leaf2f),
            "leaf2g" => leaf(&self.leaf2g),
            _ => None,
        }
    }

    fn field_names(&self) -> Vec<&str> {
        set(&[
            ("leaf2a", self.leaf2a.is_some()),
            ("leaf2b", self.leaf2b.is_some()),
            ("leaf2c", self.leaf2c.is_some()),
            ("leaf2d", self.leaf2d.is_some()),
            ("leaf2e", !self.leaf2e.is_empty()),
            ("leaf2f", self.leaf2f.is_some()),
            ("leaf2g", self.leaf2g.is_some()),
        ])
    }
}

impl ConfigNode for List2a {
    fn field(&self, name: &str) -> Option<Field<'_>> {
        match name {
            "name" => Some(Field::Leaf(self.name.clone().into())),
            "rx-power" => leaf(&self.rx_power),
            "tx-power" => leaf(&self.tx_power),
            _ => None,
        }
    }

    fn field_names(&self) -> Vec<&str> {
        set(&[
            ("name", true),
            ("rx-power", self.rx_power.is_some()),
            ("tx-power", self.tx_power.is_some()),
        ])
    }
}

impl ConfigNode for Cont1bState {
    fn field(&self, name: &str) -> Option<Field<'_>> {
        match name {
            "list2b" => list(&self.list2b),
            "note" => leaf(&self.note),
            _ => None,
        }
    }

    fn field_names(&self) -> Vec<&str> {
        set(&[
            ("list2b", !self.list2b.is_empty()),
            ("note", self.note.is_some()),
        ])
    }
}

impl ConfigNode for List2b {
    fn field(&self, name: &str) -> Option<Field<'_>> {
        match name {
            "index1" => Some(Field::Leaf(self.index1.into())),
            "index2" => Some(Field::Leaf(self.index2.into())),
            "leaf3c" => leaf(&self.leaf3c),
            "leaf3d" => leaf(&self.leaf3d),
            _ => None,
        }
    }

    fn field_names(&self) -> Vec<&str> {
        set(&[
            ("index1", true),
            ("index2", true),
            ("leaf3c", self.leaf3c.is_some()),
            ("leaf3d", self.leaf3d.is_some()),
        ])
    }
}

const BINARY: &[u8] = b"this is a test test\n";

fn list2a(name: &str, rx: u16, tx: u16) -> List2a {
    List2a {
        name: name.to_string(),
        rx_power: Some(rx),
        tx_power: Some(tx),
    }
}

fn list2b(index1: u8, index2: u8, leaf3d: Option<&str>) -> List2b {
    List2b {
        index1,
        index2,
        leaf3c: Some(format!("3c {}-{} test", index1, index2)),
        leaf3d: leaf3d.map(str::to_string),
    }
}

/// The sample device as typed model structs.
pub(crate) fn device() -> Device {
    Device {
        cont1a: Some(Cont1a {
            cont2a: Some(Cont2a {
                leaf2a: Some(1),
                leaf2b: Some(0.4321),
                leaf2e: vec![5, 4, 3, 2, 1],
                leaf2f: Some(BINARY.to_vec()),
                leaf2g: Some(true),
                ..Default::default()
            }),
            leaf1a: Some("leaf1aval".to_string()),
            list2a: vec![
                list2a("l2a1", 25, 5),
                list2a("l2a2", 26, 6),
                list2a("l2a3", 27, 8),
            ],
        }),
        cont1b_state: Some(Cont1bState {
            list2b: vec![
                list2b(10, 20, None),
                list2b(11, 20, Some("IDTYPE2")),
                list2b(11, 21, Some("IDTYPE1")),
                list2b(12, 22, Some("IDTYPE2")),
            ],
            note: Some("augmented".to_string()),
        }),
    }
}

/// The same device assembled as a generic `DataNode` tree.
pub(crate) fn device_tree() -> DataNode {
    let entry2a = |name: &str, rx: u16, tx: u16| {
        DataNode::new()
            .leaf("name", name)
            .leaf("rx-power", rx)
            .leaf("tx-power", tx)
    };
    let entry2b = |i1: u8, i2: u8, leaf3d: Option<&str>| {
        let mut node = DataNode::new()
            .leaf("index1", i1)
            .leaf("index2", i2)
            .leaf("leaf3c", format!("3c {}-{} test", i1, i2));
        if let Some(id) = leaf3d {
            node.set_leaf("leaf3d", id);
        }
        node
    };

    DataNode::new()
        .container(
            "cont1a",
            DataNode::new()
                .container(
                    "cont2a",
                    DataNode::new()
                        .leaf("leaf2a", 1u8)
                        .leaf("leaf2b", 0.4321)
                        .leaf("leaf2e", [5i16, 4, 3, 2, 1].into_iter().collect::<LeafValue>())
                        .leaf("leaf2f", BINARY.to_vec())
                        .leaf("leaf2g", true),
                )
                .leaf("leaf1a", "leaf1aval")
                .entry("list2a", entry2a("l2a1", 25, 5))
                .entry("list2a", entry2a("l2a2", 26, 6))
                .entry("list2a", entry2a("l2a3", 27, 8)),
        )
        .container(
            "cont1b-state",
            DataNode::new()
                .entry("list2b", entry2b(10, 20, None))
                .entry("list2b", entry2b(11, 20, Some("IDTYPE2")))
                .entry("list2b", entry2b(11, 21, Some("IDTYPE1")))
                .entry("list2b", entry2b(12, 22, Some("IDTYPE2")))
                .leaf("note", "augmented"),
        )
}
