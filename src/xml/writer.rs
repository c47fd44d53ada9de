//! Canonical document writer.
//!
//! Element order inside every parent is fixed; containers with nothing in
//! them are not emitted at all, so vacuous `Attributes` or `Parameters`
//! elements never reach disk.

use std::io::Cursor;

use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};

use crate::frameworks::FrameworkSet;
use crate::index::IndexDoc;
use crate::model::{
    AssemblyInfoNode, DocBlock, MemberDoc, SignatureVariant, TrackedValues, TypeDoc,
    TypeForwardNode, TypeParamNode,
};
use crate::xml::XmlError;

type Xml = Writer<Cursor<Vec<u8>>>;

/// Serialize one type document.
pub fn write_type(doc: &TypeDoc, known: &FrameworkSet) -> Result<String, XmlError> {
    let mut writer = Writer::new_with_indent(Cursor::new(Vec::new()), b' ', 2);
    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;

    let mut root = BytesStart::new("Type");
    root.push_attribute(("Name", doc.name()));
    root.push_attribute(("FullName", doc.full_name.as_str()));
    root.push_attribute(("Namespace", doc.namespace.as_str()));
    root.push_attribute(("Kind", doc.kind.as_str()));
    writer.write_event(Event::Start(root))?;

    for sig in &doc.signatures {
        write_signature(&mut writer, "TypeSignature", sig, known)?;
    }
    for assembly in &doc.assemblies {
        write_assembly_info(&mut writer, assembly)?;
    }
    write_type_params(&mut writer, &doc.type_params, known)?;
    write_tracked(&mut writer, "Base", "BaseTypeName", &doc.base, known)?;
    write_interfaces(&mut writer, &doc.interfaces, known)?;
    write_attributes(&mut writer, &doc.attributes)?;
    write_forwards(&mut writer, &doc.forwards, known)?;
    write_docs(&mut writer, &doc.docs)?;

    if !doc.members.is_empty() {
        writer.write_event(Event::Start(BytesStart::new("Members")))?;
        for member in &doc.members {
            write_member(&mut writer, member, known)?;
        }
        writer.write_event(Event::End(BytesEnd::new("Members")))?;
    }

    writer.write_event(Event::End(BytesEnd::new("Type")))?;
    finish(writer)
}

/// Serialize the top-level index document.
pub fn write_index(index: &IndexDoc) -> Result<String, XmlError> {
    let mut writer = Writer::new_with_indent(Cursor::new(Vec::new()), b' ', 2);
    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
    writer.write_event(Event::Start(BytesStart::new("Overview")))?;

    write_text_element(&mut writer, "Title", &index.title)?;

    if !index.assemblies.is_empty() {
        writer.write_event(Event::Start(BytesStart::new("Assemblies")))?;
        for assembly in &index.assemblies {
            for version in &assembly.versions {
                let mut el = BytesStart::new("Assembly");
                el.push_attribute(("Name", assembly.name.as_str()));
                el.push_attribute(("Version", version.as_str()));
                writer.write_event(Event::Empty(el))?;
            }
        }
        writer.write_event(Event::End(BytesEnd::new("Assemblies")))?;
    }

    if !index.namespaces.is_empty() {
        writer.write_event(Event::Start(BytesStart::new("Types")))?;
        for (namespace, entries) in &index.namespaces {
            let mut ns = BytesStart::new("Namespace");
            ns.push_attribute(("Name", namespace.as_str()));
            writer.write_event(Event::Start(ns))?;
            for entry in entries {
                let mut el = BytesStart::new("Type");
                el.push_attribute(("Name", entry.name.as_str()));
                el.push_attribute(("Kind", entry.kind.as_str()));
                writer.write_event(Event::Empty(el))?;
            }
            writer.write_event(Event::End(BytesEnd::new("Namespace")))?;
        }
        writer.write_event(Event::End(BytesEnd::new("Types")))?;
    }

    if !index.extension_methods.is_empty() {
        writer.write_event(Event::Start(BytesStart::new("ExtensionMethods")))?;
        for ext in &index.extension_methods {
            let mut el = BytesStart::new("ExtensionMethod");
            el.push_attribute(("Host", ext.host_type.as_str()));
            el.push_attribute(("Member", ext.member.as_str()));
            writer.write_event(Event::Empty(el))?;
        }
        writer.write_event(Event::End(BytesEnd::new("ExtensionMethods")))?;
    }

    writer.write_event(Event::End(BytesEnd::new("Overview")))?;
    finish(writer)
}

fn finish(writer: Xml) -> Result<String, XmlError> {
    let bytes = writer.into_inner().into_inner();
    let mut out = String::from_utf8(bytes)?;
    out.push('\n');
    Ok(out)
}

fn write_member(writer: &mut Xml, member: &MemberDoc, known: &FrameworkSet) -> Result<(), XmlError> {
    let mut el = BytesStart::new("Member");
    let display = member.display_name();
    el.push_attribute(("MemberName", display.as_str()));
    if let Some(style) = member.apistyle {
        el.push_attribute(("apistyle", style.as_str()));
    }
    writer.write_event(Event::Start(el))?;

    for sig in &member.signatures {
        write_signature(writer, "MemberSignature", sig, known)?;
    }
    write_text_element(writer, "MemberType", member.kind.as_str())?;

    if !member.implements.is_empty() {
        writer.write_event(Event::Start(BytesStart::new("Implements")))?;
        for implemented in &member.implements {
            write_text_element(writer, "InterfaceMember", implemented)?;
        }
        writer.write_event(Event::End(BytesEnd::new("Implements")))?;
    }

    for assembly in &member.assemblies {
        write_assembly_info(writer, assembly)?;
    }
    write_attributes(writer, &member.attributes)?;
    write_type_params(writer, &member.type_params, known)?;

    if !member.parameters.is_empty() {
        writer.write_event(Event::Start(BytesStart::new("Parameters")))?;
        for param in &member.parameters {
            let mut el = BytesStart::new("Parameter");
            el.push_attribute(("Name", param.name.as_str()));
            el.push_attribute(("Type", param.ty.as_str()));
            if let Some(ref_type) = param.ref_kind.as_attr() {
                el.push_attribute(("RefType", ref_type));
            }
            if let Some(index) = param.index {
                el.push_attribute(("Index", index.to_string().as_str()));
            }
            if let Some(alternate) = param.frameworks.encode(known) {
                el.push_attribute(("FrameworkAlternate", alternate.as_str()));
            }
            writer.write_event(Event::Empty(el))?;
        }
        writer.write_event(Event::End(BytesEnd::new("Parameters")))?;
    }

    if !member.return_type.is_empty() {
        writer.write_event(Event::Start(BytesStart::new("ReturnValue")))?;
        for entry in member.return_type.values() {
            let mut el = BytesStart::new("ReturnType");
            if let Some(alternate) = entry.frameworks.encode(known) {
                el.push_attribute(("FrameworkAlternate", alternate.as_str()));
            }
            writer.write_event(Event::Start(el))?;
            writer.write_event(Event::Text(BytesText::new(&entry.value)))?;
            writer.write_event(Event::End(BytesEnd::new("ReturnType")))?;
        }
        writer.write_event(Event::End(BytesEnd::new("ReturnValue")))?;
    }

    write_docs(writer, &member.docs)?;
    writer.write_event(Event::End(BytesEnd::new("Member")))?;
    Ok(())
}

fn write_signature(
    writer: &mut Xml,
    tag: &str,
    sig: &SignatureVariant,
    known: &FrameworkSet,
) -> Result<(), XmlError> {
    let mut el = BytesStart::new(tag);
    el.push_attribute(("Language", sig.language.as_str()));
    el.push_attribute(("Value", sig.value.as_str()));
    if let Some(usage) = &sig.usage {
        el.push_attribute(("Usage", usage.as_str()));
    }
    if let Some(alternate) = sig.frameworks.encode(known) {
        el.push_attribute(("FrameworkAlternate", alternate.as_str()));
    }
    writer.write_event(Event::Empty(el))?;
    Ok(())
}

fn write_assembly_info(writer: &mut Xml, assembly: &AssemblyInfoNode) -> Result<(), XmlError> {
    let mut el = BytesStart::new("AssemblyInfo");
    if let Some(style) = assembly.apistyle {
        el.push_attribute(("apistyle", style.as_str()));
    }
    writer.write_event(Event::Start(el))?;
    write_text_element(writer, "AssemblyName", &assembly.name)?;
    for version in &assembly.versions {
        write_text_element(writer, "AssemblyVersion", version)?;
    }
    writer.write_event(Event::End(BytesEnd::new("AssemblyInfo")))?;
    Ok(())
}

fn write_type_params(
    writer: &mut Xml,
    params: &[TypeParamNode],
    known: &FrameworkSet,
) -> Result<(), XmlError> {
    if params.is_empty() {
        return Ok(());
    }
    writer.write_event(Event::Start(BytesStart::new("TypeParameters")))?;
    for param in params {
        let mut el = BytesStart::new("TypeParameter");
        el.push_attribute(("Name", param.name.as_str()));
        if let Some(alternate) = param.frameworks.encode(known) {
            el.push_attribute(("FrameworkAlternate", alternate.as_str()));
        }
        if param.constraints.is_empty() {
            writer.write_event(Event::Empty(el))?;
        } else {
            writer.write_event(Event::Start(el))?;
            writer.write_event(Event::Start(BytesStart::new("Constraints")))?;
            for constraint in &param.constraints {
                write_text_element(writer, "BaseTypeName", constraint)?;
            }
            writer.write_event(Event::End(BytesEnd::new("Constraints")))?;
            writer.write_event(Event::End(BytesEnd::new("TypeParameter")))?;
        }
    }
    writer.write_event(Event::End(BytesEnd::new("TypeParameters")))?;
    Ok(())
}

/// A container of membership-tracked text elements, e.g.
/// `<Base><BaseTypeName FrameworkAlternate="net6">…</BaseTypeName></Base>`.
fn write_tracked(
    writer: &mut Xml,
    container: &str,
    item: &str,
    values: &TrackedValues,
    known: &FrameworkSet,
) -> Result<(), XmlError> {
    if values.is_empty() {
        return Ok(());
    }
    writer.write_event(Event::Start(BytesStart::new(container)))?;
    for entry in values.values() {
        let mut el = BytesStart::new(item);
        if let Some(alternate) = entry.frameworks.encode(known) {
            el.push_attribute(("FrameworkAlternate", alternate.as_str()));
        }
        writer.write_event(Event::Start(el))?;
        writer.write_event(Event::Text(BytesText::new(&entry.value)))?;
        writer.write_event(Event::End(BytesEnd::new(item)))?;
    }
    writer.write_event(Event::End(BytesEnd::new(container)))?;
    Ok(())
}

fn write_interfaces(
    writer: &mut Xml,
    interfaces: &TrackedValues,
    known: &FrameworkSet,
) -> Result<(), XmlError> {
    if interfaces.is_empty() {
        return Ok(());
    }
    writer.write_event(Event::Start(BytesStart::new("Interfaces")))?;
    for entry in interfaces.values() {
        let mut el = BytesStart::new("Interface");
        if let Some(alternate) = entry.frameworks.encode(known) {
            el.push_attribute(("FrameworkAlternate", alternate.as_str()));
        }
        writer.write_event(Event::Start(el))?;
        write_text_element(writer, "InterfaceName", &entry.value)?;
        writer.write_event(Event::End(BytesEnd::new("Interface")))?;
    }
    writer.write_event(Event::End(BytesEnd::new("Interfaces")))?;
    Ok(())
}

fn write_attributes(writer: &mut Xml, attributes: &[String]) -> Result<(), XmlError> {
    if attributes.is_empty() {
        return Ok(());
    }
    writer.write_event(Event::Start(BytesStart::new("Attributes")))?;
    for attribute in attributes {
        writer.write_event(Event::Start(BytesStart::new("Attribute")))?;
        write_text_element(writer, "AttributeName", attribute)?;
        writer.write_event(Event::End(BytesEnd::new("Attribute")))?;
    }
    writer.write_event(Event::End(BytesEnd::new("Attributes")))?;
    Ok(())
}

fn write_forwards(
    writer: &mut Xml,
    forwards: &[TypeForwardNode],
    known: &FrameworkSet,
) -> Result<(), XmlError> {
    if forwards.is_empty() {
        return Ok(());
    }
    writer.write_event(Event::Start(BytesStart::new("TypeForwardingChain")))?;
    for forward in forwards {
        let mut el = BytesStart::new("TypeForwarding");
        el.push_attribute(("From", forward.from_assembly.as_str()));
        el.push_attribute(("FromVersion", forward.from_version.as_str()));
        el.push_attribute(("To", forward.to_assembly.as_str()));
        el.push_attribute(("ToVersion", forward.to_version.as_str()));
        if let Some(alternate) = forward.frameworks.encode(known) {
            el.push_attribute(("FrameworkAlternate", alternate.as_str()));
        }
        writer.write_event(Event::Empty(el))?;
    }
    writer.write_event(Event::End(BytesEnd::new("TypeForwardingChain")))?;
    Ok(())
}

/// Docs children carry raw, pre-escaped XML fragments: whatever the user
/// wrote goes back out byte for byte.
fn write_docs(writer: &mut Xml, docs: &DocBlock) -> Result<(), XmlError> {
    writer.write_event(Event::Start(BytesStart::new("Docs")))?;

    write_raw_element(writer, "summary", &docs.summary)?;
    for (name, text) in &docs.params {
        let mut el = BytesStart::new("param");
        el.push_attribute(("name", name.as_str()));
        write_raw_with_start(writer, "param", el, text)?;
    }
    for (name, text) in &docs.typeparams {
        let mut el = BytesStart::new("typeparam");
        el.push_attribute(("name", name.as_str()));
        write_raw_with_start(writer, "typeparam", el, text)?;
    }
    if let Some(returns) = &docs.returns {
        write_raw_element(writer, "returns", returns)?;
    }
    if let Some(value) = &docs.value {
        write_raw_element(writer, "value", value)?;
    }
    if let Some(remarks) = &docs.remarks {
        write_raw_element(writer, "remarks", remarks)?;
    }
    for exception in &docs.exceptions {
        let mut el = BytesStart::new("exception");
        el.push_attribute(("cref", exception.cref.as_str()));
        write_raw_with_start(writer, "exception", el, &exception.text)?;
    }
    for altmember in &docs.altmembers {
        let mut el = BytesStart::new("altmember");
        el.push_attribute(("cref", altmember.as_str()));
        writer.write_event(Event::Empty(el))?;
    }

    writer.write_event(Event::End(BytesEnd::new("Docs")))?;
    Ok(())
}

fn write_raw_element(writer: &mut Xml, tag: &str, raw: &str) -> Result<(), XmlError> {
    write_raw_with_start(writer, tag, BytesStart::new(tag), raw)
}

/// Raw fragments go out pre-escaped; empty content collapses to a
/// self-closing element so the indenting writer cannot pad it.
fn write_raw_with_start(
    writer: &mut Xml,
    tag: &str,
    start: BytesStart<'_>,
    raw: &str,
) -> Result<(), XmlError> {
    if raw.is_empty() {
        writer.write_event(Event::Empty(start))?;
        return Ok(());
    }
    writer.write_event(Event::Start(start))?;
    writer.write_event(Event::Text(BytesText::from_escaped(raw)))?;
    writer.write_event(Event::End(BytesEnd::new(tag)))?;
    Ok(())
}

fn write_text_element(writer: &mut Xml, tag: &str, text: &str) -> Result<(), XmlError> {
    if text.is_empty() {
        writer.write_event(Event::Empty(BytesStart::new(tag)))?;
        return Ok(());
    }
    writer.write_event(Event::Start(BytesStart::new(tag)))?;
    writer.write_event(Event::Text(BytesText::new(text)))?;
    writer.write_event(Event::End(BytesEnd::new(tag)))?;
    Ok(())
}
