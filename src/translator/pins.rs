/// Port names of one node, indexed by the editor's pin position.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PinTable {
    inputs: Vec<String>,
    outputs: Vec<String>,
}

impl PinTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn input(mut self, name: impl Into<String>) -> Self {
        self.inputs.push(name.into());
        self
    }

    pub fn output(mut self, name: impl Into<String>) -> Self {
        self.outputs.push(name.into());
        self
    }

    /// Appends `{prefix}_0 .. {prefix}_{count-1}` as input pins.
    pub fn numbered_inputs(mut self, prefix: &str, count: usize) -> Self {
        self.inputs
            .extend((0..count).map(|i| format!("{}_{}", prefix, i)));
        self
    }

    /// Appends `{prefix}_0 .. {prefix}_{count-1}` as output pins.
    pub fn numbered_outputs(mut self, prefix: &str, count: usize) -> Self {
        self.outputs
            .extend((0..count).map(|i| format!("{}_{}", prefix, i)));
        self
    }

    pub fn inputs_from<'a>(mut self, names: impl IntoIterator<Item = &'a str>) -> Self {
        self.inputs.extend(names.into_iter().map(str::to_string));
        self
    }

    pub fn outputs_from<'a>(mut self, names: impl IntoIterator<Item = &'a str>) -> Self {
        self.outputs.extend(names.into_iter().map(str::to_string));
        self
    }

    pub fn input_port(&self, index: usize) -> Option<&str> {
        self.inputs.get(index).map(String::as_str)
    }

    pub fn output_port(&self, index: usize) -> Option<&str> {
        self.outputs.get(index).map(String::as_str)
    }

    pub fn inputs(&self) -> &[String] {
        &self.inputs
    }

    pub fn outputs(&self) -> &[String] {
        &self.outputs
    }
}
