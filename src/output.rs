use squaredup::Node;
use squaredup::api::LatestDataSource;
use tabled::settings::Style;
use tabled::{Table, Tabled};

#[derive(Tabled)]
struct NodeRow<'a> {
    #[tabled(rename = "ID")]
    id: &'a str,
    #[tabled(rename = "Name")]
    name: &'a str,
    #[tabled(rename = "Type")]
    node_type: &'a str,
    #[tabled(rename = "Source ID")]
    source_id: &'a str,
}

#[derive(Tabled)]
struct PluginRow<'a> {
    #[tabled(rename = "ID")]
    id: &'a str,
    #[tabled(rename = "Display Name")]
    display_name: &'a str,
    #[tabled(rename = "Version")]
    version: &'a str,
    #[tabled(rename = "Category")]
    category: &'a str,
}

pub fn nodes_table(nodes: &[Node]) -> String {
    let rows = nodes.iter().map(|node| NodeRow {
        id: &node.id,
        name: node.name().unwrap_or("-"),
        node_type: node.node_type().unwrap_or("-"),
        source_id: node.source_id().unwrap_or("-"),
    });
    Table::new(rows).with(Style::rounded()).to_string()
}

pub fn plugins_table(plugins: &[LatestDataSource]) -> String {
    let rows = plugins.iter().map(|plugin| PluginRow {
        id: &plugin.plugin_id,
        display_name: &plugin.display_name,
        version: &plugin.version,
        category: &plugin.category,
    });
    Table::new(rows).with(Style::rounded()).to_string()
}
